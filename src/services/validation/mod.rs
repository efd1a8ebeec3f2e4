//! Declarative validation.
//!
//! A [`RuleSet`] binds field names to predicates over one request type. Rule
//! sets are registered per request type in a [`ValidatorRegistry`], which the
//! pipeline consults before running a handler.

mod item_rules;

pub use item_rules::{
    create_item_rules, delete_item_rules, item_validators, list_items_rules, update_item_rules,
    MAX_PAGE_SIZE,
};

use async_trait::async_trait;
use serde::Serialize;
use std::{
    any::{Any, TypeId},
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

impl FieldFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure messages grouped by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn from_failures(failures: impl IntoIterator<Item = FieldFailure>) -> Self {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for failure in failures {
            grouped.entry(failure.field).or_default().push(failure.message);
        }
        Self(grouped)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one failure
    pub fn field_count(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "One or more validation errors occurred")?;
        for (field, messages) in &self.0 {
            write!(f, "; {}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Something that can check a request of type `T`
#[async_trait]
pub trait Validator<T: Sync>: Send + Sync {
    async fn validate(&self, input: &T) -> Vec<FieldFailure>;
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A predicate over `T` that reports `message` against `field` when false
pub struct Rule<T> {
    field: &'static str,
    message: String,
    predicate: Predicate<T>,
}

impl<T> Rule<T> {
    pub fn new(
        field: &'static str,
        message: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            field,
            message: message.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn check(&self, input: &T) -> Option<FieldFailure> {
        if (self.predicate)(input) {
            None
        } else {
            Some(FieldFailure::new(self.field, self.message.clone()))
        }
    }
}

/// An ordered collection of rules, all of which are evaluated on every check
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rule(
        mut self,
        field: &'static str,
        message: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule::new(field, message, predicate));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule, collecting each failure
    pub fn check(&self, input: &T) -> Vec<FieldFailure> {
        self.rules.iter().filter_map(|rule| rule.check(input)).collect()
    }
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Validator<T> for RuleSet<T> {
    async fn validate(&self, input: &T) -> Vec<FieldFailure> {
        self.check(input)
    }
}

type Validators<T> = Vec<Arc<dyn Validator<T>>>;

/// Validators keyed by the request type they check
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator for requests of type `T`
    pub fn register<T, V>(&mut self, validator: V) -> &mut Self
    where
        T: Send + Sync + 'static,
        V: Validator<T> + 'static,
    {
        let entry = self
            .validators
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Validators::<T>::new()));

        if let Some(list) = entry.downcast_mut::<Validators<T>>() {
            list.push(Arc::new(validator));
        }
        self
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with<T, V>(mut self, validator: V) -> Self
    where
        T: Send + Sync + 'static,
        V: Validator<T> + 'static,
    {
        self.register::<T, V>(validator);
        self
    }

    /// All validators registered for `T`, in registration order
    pub fn validators_for<T: Send + Sync + 'static>(&self) -> &[Arc<dyn Validator<T>>] {
        self.validators
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Validators<T>>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
        y: i32,
    }

    fn point_rules() -> RuleSet<Point> {
        RuleSet::<Point>::new()
            .rule("x", "x must be positive", |p: &Point| p.x > 0)
            .rule("x", "x must be even", |p: &Point| p.x % 2 == 0)
            .rule("y", "y must be positive", |p: &Point| p.y > 0)
    }

    #[test]
    fn test_rule_set_reports_every_failure() {
        let failures = point_rules().check(&Point { x: -3, y: -1 });

        assert_eq!(
            failures,
            vec![
                FieldFailure::new("x", "x must be positive"),
                FieldFailure::new("x", "x must be even"),
                FieldFailure::new("y", "y must be positive"),
            ]
        );
        assert!(point_rules().check(&Point { x: 2, y: 1 }).is_empty());
    }

    #[test]
    fn test_failures_are_grouped_by_field() {
        let errors = ValidationErrors::from_failures(point_rules().check(&Point { x: -3, y: 5 }));

        assert_eq!(errors.field_count(), 1);
        assert_eq!(
            errors.get("x"),
            Some(&["x must be positive".to_string(), "x must be even".to_string()][..])
        );
        assert!(!errors.contains_field("y"));
    }

    #[test]
    fn test_errors_serialize_as_field_map() {
        let errors = ValidationErrors::from_failures(vec![
            FieldFailure::new("title", "Title cannot be empty."),
            FieldFailure::new("price", "The price must be greater than zero."),
        ]);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "price": ["The price must be greater than zero."],
                "title": ["Title cannot be empty."]
            })
        );
    }

    #[test]
    fn test_registry_keys_by_request_type() {
        let registry = ValidatorRegistry::new()
            .with::<Point, _>(point_rules())
            .with::<Point, _>(RuleSet::<Point>::new().rule("y", "y too big", |p: &Point| p.y < 10));

        assert_eq!(registry.validators_for::<Point>().len(), 2);
        assert!(registry.validators_for::<String>().is_empty());
    }
}
