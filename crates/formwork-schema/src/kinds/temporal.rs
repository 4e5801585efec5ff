//! Date, date-time and time kinds.
//!
//! Values must be complete, zero-padded ISO strings (`YYYY-MM-DD`,
//! `YYYY-MM-DDTHH:MM:SS[.fff][Z|±HH:MM]`, `HH:MM[:SS]`); anything else fails
//! the shape stage before bounds are considered. Bounds are compared on the
//! parsed values and shown in messages in the locale's display format.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use formwork_core::i18n::dates::{
    parse_date_time_bound, parse_iso_date, parse_iso_date_time, parse_iso_time,
};
use formwork_core::i18n::formats::{format_date, format_date_time, format_time};
use formwork_core::i18n::timezone::localtime_with_offset;
use formwork_core::{FormworkError, FormworkResult};

use super::{finish_scalar, initial_scalar, is_empty_scalar, mismatch, scalar};
use crate::constraints::{ExpectedType, FormatCheck, TypeCheck};
use crate::context::ValidationContext;
use crate::definition::{ComponentBase, ComponentDefinition, DateDefinition};
use crate::messages::{
    MessageDescriptor, INVALID_DATE, INVALID_DATETIME, INVALID_TIME, MAX_DATE, MAX_TIME, MIN_DATE,
    MIN_TIME, TIME_RANGE,
};
use crate::registry::ComponentBehavior;
use crate::report::ViolationKind;
use crate::schema::Schema;
use crate::validator::{Check, Failure, Stage};
use crate::value::Value;

/// Which end of a range a bound closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Values must not be earlier.
    Min,
    /// Values must not be later.
    Max,
}

impl Side {
    const fn date_descriptor(self) -> (MessageDescriptor, &'static str) {
        match self {
            Self::Min => (MIN_DATE, "minDate"),
            Self::Max => (MAX_DATE, "maxDate"),
        }
    }
}

/// An inclusive bound over values parsed by `parse`.
///
/// Values that do not parse pass; the shape stage reports them.
pub struct OrderedBound<T> {
    side: Side,
    limit: T,
    display: String,
    parse: Box<dyn Fn(&str) -> Option<T> + Send + Sync>,
}

impl<T> OrderedBound<T> {
    /// Creates a bound at `limit`, shown as `display`.
    pub fn new(
        side: Side,
        limit: T,
        display: impl Into<String>,
        parse: impl Fn(&str) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            side,
            limit,
            display: display.into(),
            parse: Box::new(parse),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedBound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedBound")
            .field("side", &self.side)
            .field("limit", &self.limit)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

impl<T: PartialOrd + fmt::Debug + Send + Sync> Check for OrderedBound<T> {
    fn stage(&self) -> Stage {
        Stage::Bound
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        let Some(parsed) = value.as_str().and_then(|s| (self.parse)(s)) else {
            return Ok(None);
        };
        let outside = match self.side {
            Side::Min => parsed < self.limit,
            Side::Max => parsed > self.limit,
        };
        let (descriptor, name) = self.side.date_descriptor();
        Ok(outside
            .then(|| Failure::new(ViolationKind::Bound, descriptor).with(name, self.display.clone())))
    }
}

/// The allowed times of day.
///
/// With both ends set and `min > max`, the range wraps around midnight:
/// `22:00..06:00` allows `23:30` and `05:00` but not `12:00`.
#[derive(Debug, Clone)]
pub struct TimeRangeCheck {
    min: Option<(NaiveTime, String)>,
    max: Option<(NaiveTime, String)>,
}

impl TimeRangeCheck {
    /// Creates a range check; either end may be open.
    pub const fn new(min: Option<(NaiveTime, String)>, max: Option<(NaiveTime, String)>) -> Self {
        Self { min, max }
    }

    fn allows(&self, time: NaiveTime) -> bool {
        match (&self.min, &self.max) {
            (Some((min, _)), Some((max, _))) if min <= max => *min <= time && time <= *max,
            (Some((min, _)), Some((max, _))) => time >= *min || time <= *max,
            (Some((min, _)), None) => time >= *min,
            (None, Some((max, _))) => time <= *max,
            (None, None) => true,
        }
    }
}

impl Check for TimeRangeCheck {
    fn stage(&self) -> Stage {
        Stage::Bound
    }

    fn check(&self, value: &Value) -> FormworkResult<Option<Failure>> {
        let Some(time) = value.as_str().and_then(parse_iso_time) else {
            return Ok(None);
        };
        if self.allows(time) {
            return Ok(None);
        }
        let failure = match (&self.min, &self.max) {
            (Some((_, min)), Some((_, max))) => Failure::new(ViolationKind::Bound, TIME_RANGE)
                .with("minTime", min.clone())
                .with("maxTime", max.clone()),
            (Some((_, min)), None) => {
                Failure::new(ViolationKind::Bound, MIN_TIME).with("minTime", min.clone())
            }
            (None, Some((_, max))) => {
                Failure::new(ViolationKind::Bound, MAX_TIME).with("maxTime", max.clone())
            }
            (None, None) => return Ok(None),
        };
        Ok(Some(failure))
    }
}

fn parses_as_date(value: &str) -> bool {
    parse_iso_date(value).is_some()
}

fn parses_as_date_time(value: &str) -> bool {
    parse_iso_date_time(value, 0).is_some()
}

fn parses_as_time(value: &str) -> bool {
    parse_iso_time(value).is_some()
}

/// Parses a declared bound, treating blank as absent.
fn declared<T>(
    base: &ComponentBase,
    name: &str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> FormworkResult<Option<T>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    parse(raw).map(Some).ok_or_else(|| {
        FormworkError::invalid_definition(&base.key, format!("unparseable {name} '{raw}'"))
    })
}

fn date_bound(
    base: &ComponentBase,
    ctx: &ValidationContext,
    side: Side,
    raw: Option<&str>,
) -> FormworkResult<Option<OrderedBound<NaiveDate>>> {
    let offset = ctx.time_zone_offset();
    let name = side.date_descriptor().1;
    let limit = declared(base, name, raw, |s| {
        parse_date_time_bound(s, offset).map(|instant| instant.date_naive())
    })?;
    Ok(limit.map(|limit| {
        OrderedBound::new(side, limit, format_date(limit, ctx.locale()), parse_iso_date)
    }))
}

fn date_time_bound(
    base: &ComponentBase,
    ctx: &ValidationContext,
    side: Side,
    raw: Option<&str>,
) -> FormworkResult<Option<OrderedBound<DateTime<FixedOffset>>>> {
    let offset = ctx.time_zone_offset();
    let name = side.date_descriptor().1;
    let limit = declared(base, name, raw, |s| parse_date_time_bound(s, offset))?;
    Ok(limit.map(|limit| {
        let shown = localtime_with_offset(&limit, offset).naive_local();
        OrderedBound::new(
            side,
            limit,
            format_date_time(shown, ctx.locale()),
            move |s| parse_iso_date_time(s, offset),
        )
    }))
}

fn date_schema(def: &DateDefinition, ctx: &ValidationContext) -> FormworkResult<Schema> {
    let picker = &def.date_picker;
    let builder = scalar(&def.base, ctx, Value::is_blank)
        .check(TypeCheck::new(ExpectedType::String))
        .check(FormatCheck::new("date", parses_as_date, INVALID_DATE).as_shape())
        .check_opt(date_bound(&def.base, ctx, Side::Min, picker.min_date.as_deref())?)
        .check_opt(date_bound(&def.base, ctx, Side::Max, picker.max_date.as_deref())?);
    Ok(finish_scalar(&def.base, ctx, builder))
}

fn date_time_schema(def: &DateDefinition, ctx: &ValidationContext) -> FormworkResult<Schema> {
    let picker = &def.date_picker;
    let builder = scalar(&def.base, ctx, Value::is_blank)
        .check(TypeCheck::new(ExpectedType::String))
        .check(FormatCheck::new("datetime", parses_as_date_time, INVALID_DATETIME).as_shape())
        .check_opt(date_time_bound(&def.base, ctx, Side::Min, picker.min_date.as_deref())?)
        .check_opt(date_time_bound(&def.base, ctx, Side::Max, picker.max_date.as_deref())?);
    Ok(finish_scalar(&def.base, ctx, builder))
}

fn time_schema(base: &ComponentBase, ctx: &ValidationContext) -> FormworkResult<Schema> {
    let rules = &base.validate;
    let shown = |time: NaiveTime| (time, format_time(time, ctx.locale()));
    let min = declared(base, "minTime", rules.min_time.as_deref(), parse_iso_time)?.map(shown);
    let max = declared(base, "maxTime", rules.max_time.as_deref(), parse_iso_time)?.map(shown);
    let range = (min.is_some() || max.is_some()).then(|| TimeRangeCheck::new(min, max));

    let builder = scalar(base, ctx, Value::is_blank)
        .check(TypeCheck::new(ExpectedType::String))
        .check(FormatCheck::new("time", parses_as_time, INVALID_TIME).as_shape())
        .check_opt(range);
    Ok(finish_scalar(base, ctx, builder))
}

/// `date`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateBehavior;

impl ComponentBehavior for DateBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Date(def) = component else {
            return Err(mismatch(component, "date"));
        };
        date_schema(def, ctx)
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, Value::is_blank)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::from(""))
    }
}

/// `datetime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatetimeBehavior;

impl ComponentBehavior for DatetimeBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Datetime(def) = component else {
            return Err(mismatch(component, "datetime"));
        };
        date_time_schema(def, ctx)
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, Value::is_blank)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::from(""))
    }
}

/// `time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeBehavior;

impl ComponentBehavior for TimeBehavior {
    fn build_schema(
        &self,
        component: &ComponentDefinition,
        ctx: &ValidationContext,
    ) -> FormworkResult<Schema> {
        let ComponentDefinition::Time(def) = component else {
            return Err(mismatch(component, "time"));
        };
        time_schema(&def.base, ctx)
    }

    fn is_empty(&self, component: &ComponentDefinition, value: Option<&Value>) -> bool {
        is_empty_scalar(component, value, Value::is_blank)
    }

    fn initial_value(&self, component: &ComponentDefinition) -> Value {
        initial_scalar(component, Value::from(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_with(definition: serde_json::Value, ctx: &ValidationContext) -> Schema {
        let component: ComponentDefinition = serde_json::from_value(definition).unwrap();
        ctx.lookup(component.kind())
            .unwrap()
            .build_schema(&component, ctx)
            .unwrap()
    }

    async fn outcome(schema: &Schema, key: &str, value: &str) -> Vec<(String, String)> {
        let value = Value::from(value);
        let report = schema.validate_field(key, Some(&value)).await.unwrap();
        report
            .violations()
            .iter()
            .map(|v| (v.code.clone(), v.message.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_datetime_min_date() {
        let ctx = ValidationContext::for_locale("en");
        let schema = schema_with(
            json!({"type": "datetime", "key": "start",
                   "datePicker": {"minDate": "2025-10-08T12:00"}}),
            &ctx,
        );
        assert!(outcome(&schema, "start", "2025-10-08T12:51:00").await.is_empty());
        assert_eq!(
            outcome(&schema, "start", "2025-10-08T11:00:00").await,
            vec![(
                "minDate".to_string(),
                "The value must be 10/8/2025, 12:00 PM or later.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_datetime_bound_uses_context_offset() {
        let ctx = ValidationContext::for_locale("nl").with_time_zone_offset(2 * 3600);
        let schema = schema_with(
            json!({"type": "datetime", "key": "start",
                   "datePicker": {"maxDate": "2025-10-08T12:00:00+02:00"}}),
            &ctx,
        );
        assert!(outcome(&schema, "start", "2025-10-08T10:00:00Z").await.is_empty());
        let violations = outcome(&schema, "start", "2025-10-08T10:30:00Z").await;
        assert_eq!(violations[0].0, "maxDate");
        assert!(violations[0].1.contains("8-10-2025, 12:00"));
    }

    #[tokio::test]
    async fn test_partial_datetime_fails_shape_before_bounds() {
        let ctx = ValidationContext::for_locale("en");
        let schema = schema_with(
            json!({"type": "datetime", "key": "start",
                   "datePicker": {"minDate": "2030-01-01T00:00"}}),
            &ctx,
        );
        for partial in ["2025-10-08", "2025-10-08T11:00", "2025-10-08 11:00:00", "2025-13-08T11:00:00"] {
            let violations = outcome(&schema, "start", partial).await;
            assert_eq!(violations.len(), 1, "{partial}");
            assert_eq!(violations[0].0, "invalidDatetime");
        }
    }

    #[tokio::test]
    async fn test_date_bounds() {
        let ctx = ValidationContext::for_locale("nl");
        let schema = schema_with(
            json!({"type": "date", "key": "dob",
                   "datePicker": {"minDate": "2000-01-01", "maxDate": "2025-10-08T23:00"}}),
            &ctx,
        );
        assert!(outcome(&schema, "dob", "2025-10-08").await.is_empty());
        let violations = outcome(&schema, "dob", "1999-12-31").await;
        assert_eq!(violations[0].0, "minDate");
        assert!(violations[0].1.contains("1-1-2000"));
        assert_eq!(outcome(&schema, "dob", "2025-10-09").await[0].0, "maxDate");
        assert_eq!(outcome(&schema, "dob", "8-10-2025").await[0].0, "invalidDate");
    }

    #[tokio::test]
    async fn test_time_range() {
        let ctx = ValidationContext::for_locale("en-GB");
        let schema = schema_with(
            json!({"type": "time", "key": "t",
                   "validate": {"minTime": "09:00", "maxTime": "17:00"}}),
            &ctx,
        );
        assert!(outcome(&schema, "t", "12:00").await.is_empty());
        assert_eq!(
            outcome(&schema, "t", "08:59").await,
            vec![(
                "timeRange".to_string(),
                "Only times between 09:00 and 17:00 are allowed.".to_string()
            )]
        );
        assert_eq!(outcome(&schema, "t", "9:00").await[0].0, "invalidTime");
    }

    #[tokio::test]
    async fn test_time_range_wraps_midnight() {
        let ctx = ValidationContext::for_locale("nl");
        let schema = schema_with(
            json!({"type": "time", "key": "t",
                   "validate": {"minTime": "22:00", "maxTime": "06:00"}}),
            &ctx,
        );
        assert!(outcome(&schema, "t", "23:30").await.is_empty());
        assert!(outcome(&schema, "t", "05:00:00").await.is_empty());
        assert_eq!(outcome(&schema, "t", "12:00").await[0].0, "timeRange");
    }

    #[tokio::test]
    async fn test_single_sided_time_bounds() {
        let ctx = ValidationContext::for_locale("en");
        let min_only = schema_with(
            json!({"type": "time", "key": "t", "validate": {"minTime": "09:00"}}),
            &ctx,
        );
        assert_eq!(
            outcome(&min_only, "t", "08:00").await,
            vec![("minTime".to_string(), "Only times from 9:00 AM are allowed.".to_string())]
        );
        let max_only = schema_with(
            json!({"type": "time", "key": "t", "validate": {"maxTime": "17:00"}}),
            &ctx,
        );
        assert_eq!(outcome(&max_only, "t", "17:01").await[0].0, "maxTime");
    }

    #[test]
    fn test_unparseable_bound_is_a_definition_error() {
        let ctx = ValidationContext::for_locale("en");
        let component: ComponentDefinition = serde_json::from_value(json!({
            "type": "date", "key": "d", "datePicker": {"minDate": "yesterday"}
        }))
        .unwrap();
        let err = DateBehavior.build_schema(&component, &ctx).unwrap_err();
        assert!(matches!(err, FormworkError::InvalidDefinition { ref key, .. } if key == "d"));
    }

    #[test]
    fn test_blank_bounds_are_ignored() {
        let ctx = ValidationContext::for_locale("en");
        let component: ComponentDefinition = serde_json::from_value(json!({
            "type": "date", "key": "d", "datePicker": {"minDate": "", "maxDate": null}
        }))
        .unwrap();
        assert!(DateBehavior.build_schema(&component, &ctx).is_ok());
    }
}
