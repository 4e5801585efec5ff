//! Numeric kinds: number and currency.
//!
//! `null` is the canonical empty value. The empty string is accepted as
//! empty too, for submissions produced by older form renderers; neither
//! counts as a value when the component is required. Zero is a value.

use formwork_core::i18n::formats::{format_currency, format_number};
use formwork_core::{FormworkResult, Locale};

use super::{finish_scalar, initial_scalar, is_empty_scalar, mismatch, scalar};
use crate::constraints::{DecimalLimitCheck, ExpectedType, MaxValueCheck, MinValueCheck, TypeCheck};
use crate::context::ValidationContext;
use crate::definition::{ComponentDefinition, NumberDefinition};
use crate::registry::ComponentBehavior;
use crate::schema::Schema;
use crate::value::Value;

/// Fraction digits shown for a plain number bound without a decimal limit.
const DEFAULT_FRACTION_DIGITS: usize = 10;

/// Emptiness of a numeric value: `null` or a blank string.
pub fn is_empty_number(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn number_schema(
    def: &NumberDefinition,
    ctx: &ValidationContext,
    display: impl Fn(f64) -> String,
) -> Schema {
    let base = &def.base;
    let rules = &base.validate;
    let builder = scalar(base, ctx, is_empty_number)
        .check(TypeCheck::new(ExpectedType::Number))
        .check_opt(def.decimal_limit.map(DecimalLimitCheck::new))
        .check_opt(rules.min.map(|min| MinValueCheck::new(min, display(min))))
        .check_opt(rules.max.map(|max| MaxValueCheck::new(max, display(max))));
    finish_scalar(base, ctx, builder)
}

fn number_bound_display(def: &NumberDefinition, locale: &Locale) -> impl Fn(f64) -> String {
    let locale = locale.clone();
    let digits = def
        .decimal_limit
        .and_then(|limit| usize::try_from(limit).ok())
        .unwrap_or(DEFAULT_FRACTION_DIGITS);
    move |bound| format_number(bound, &locale, digits)
}

/// `number`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberBehavior;

impl ComponentBehavior for NumberBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Number(def) = component else {
            return Err(mismatch(component, "number"));
        };
        Ok(number_schema(def, ctx, number_bound_display(def, ctx.locale())))
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, is_empty_number)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::Null)
    }
}

/// `currency`. Bounds are shown as amounts in the component's currency, or
/// the context's default currency.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyBehavior;

impl ComponentBehavior for CurrencyBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Currency(def) = component else {
            return Err(mismatch(component, "currency"));
        };
        let currency = def
            .currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| ctx.default_currency());
        let locale = ctx.locale();
        Ok(number_schema(def, ctx, |bound| {
            format_currency(bound, currency, locale)
        }))
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, is_empty_number)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::Null)
    }
}
