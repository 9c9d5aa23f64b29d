//! Form sink: hidden attribution fields on lead forms
//!
//! For every tracked key present in the record, the form gains a hidden
//! field of that name. Existing fields are overwritten in place, so the
//! record side of the policy is last-write-wins and a field is never
//! duplicated.

use crate::page::{FormField, FormModel};
use crate::record::AttributionRecord;

/// Derived keys propagated into forms alongside the tracked params
const DERIVED_FORM_KEYS: [&str; 2] = ["landing_page", "referrer"];

/// Ensure a hidden field per tracked key present in the record
///
/// Returns the number of fields created or updated.
pub fn apply_record(form: &mut FormModel, record: &AttributionRecord) -> usize {
    let mut written = 0;

    for (key, value) in record.params() {
        write_field(form, key.as_str(), value);
        written += 1;
    }

    for (name, value) in DERIVED_FORM_KEYS.iter().zip(
        [record.landing_page.as_deref(), record.referrer.as_deref()]
            .into_iter(),
    ) {
        if let Some(value) = value {
            write_field(form, name, value);
            written += 1;
        }
    }

    written
}

fn write_field(form: &mut FormModel, name: &str, value: &str) {
    if let Some(field) = form.field_mut(name) {
        field.value = value.to_string();
    } else {
        form.fields.push(FormField::hidden(name, value));
    }
}
