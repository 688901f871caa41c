//! Client-side form handling.
//!
//! [`ValidationEngine`] tracks values, errors and touched flags for a fixed set of fields and
//! drives inline feedback: a field shows no error before it was first blurred, and once
//! touched it is re-validated on every change. [`contact`] configures it for the contact
//! form and [`submit`] sends the result with a cancellation scope and a timeout.

pub mod contact;
pub mod i18n;
pub mod submit;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Checks one field value, returning a message if it is invalid.
pub type Validator = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Per-field validation state for a form.
///
/// Validators are kept in an explicit table in declaration order; [`validate`](Self::validate)
/// and [`first_error`](Self::first_error) follow that order. The errors map only ever holds
/// keys of fields that have a validator, and a missing key means "no error".
pub struct ValidationEngine<F> {
    initial: HashMap<F, String>,
    values: HashMap<F, String>,
    errors: HashMap<F, String>,
    touched: HashSet<F>,
    validators: Vec<(F, Validator)>,
}

impl<F> ValidationEngine<F>
where
    F: Copy + Eq + Hash,
{
    pub fn new<I, S>(initial_values: I) -> Self
    where
        I: IntoIterator<Item = (F, S)>,
        S: Into<String>,
    {
        let initial: HashMap<F, String> = initial_values.into_iter().map(|(f, v)| (f, v.into())).collect();
        Self {
            values: initial.clone(),
            initial,
            errors: HashMap::new(),
            touched: HashSet::new(),
            validators: Vec::new(),
        }
    }

    /// Appends a validator to the table. A field configured twice keeps its first validator.
    pub fn with_validator<V>(mut self, field: F, validator: V) -> Self
    where
        V: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        if !self.validators.iter().any(|(f, _)| *f == field) {
            self.validators.push((field, Box::new(validator)));
        }
        self
    }

    /// Returns an updater that sets `field`'s value. Once the field was touched the updater
    /// also re-runs its validator.
    pub fn handle_change(&mut self, field: F) -> impl FnMut(String) + '_ {
        move |value| {
            self.values.insert(field, value);
            if self.touched.contains(&field) {
                self.run_validator(field);
            }
        }
    }

    /// Marks `field` touched and validates it.
    pub fn handle_blur(&mut self, field: F) {
        self.touched.insert(field);
        self.run_validator(field);
    }

    /// Runs every validator, marks every configured field touched and returns `true` if
    /// no validator reported a message.
    pub fn validate(&mut self) -> bool {
        let mut errors = HashMap::new();
        for (field, validator) in &self.validators {
            if let Some(msg) = validator(self.values.get(field).map(String::as_str).unwrap_or("")) {
                errors.insert(*field, msg);
            }
            self.touched.insert(*field);
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Restores the initial values and clears errors and touched flags.
    pub fn reset_form(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
    }

    /// Sets a value without validating it.
    pub fn set_field_value(&mut self, field: F, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn value(&self, field: F) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &HashMap<F, String> {
        &self.values
    }

    pub fn error(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &HashMap<F, String> {
        &self.errors
    }

    pub fn is_touched(&self, field: F) -> bool {
        self.touched.contains(&field)
    }

    /// The error to render: only shown once the field was touched.
    pub fn visible_error(&self, field: F) -> Option<&str> {
        if self.is_touched(field) {
            self.error(field)
        } else {
            None
        }
    }

    /// First current error in validator order, e.g. to move focus there.
    pub fn first_error(&self) -> Option<(F, &str)> {
        self.validators
            .iter()
            .find_map(|(f, _)| self.errors.get(f).map(|msg| (*f, msg.as_str())))
    }

    fn run_validator(&mut self, field: F) {
        let Some((_, validator)) = self.validators.iter().find(|(f, _)| *f == field) else {
            return;
        };
        match validator(self.values.get(&field).map(String::as_str).unwrap_or("")) {
            Some(msg) => {
                self.errors.insert(field, msg);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }
}

impl<F: fmt::Debug> fmt::Debug for ValidationEngine<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("touched", &self.touched)
            .field("validators", &self.validators.iter().map(|(f, _)| f).collect::<Vec<_>>())
            .finish()
    }
}
