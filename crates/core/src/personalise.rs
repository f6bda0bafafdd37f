//! Message template personalisation.
//!
//! Templates carry `{token}` placeholders substituted literally at dispatch
//! time. Substitution is intentionally dumb: no escaping, no expression
//! language, and unknown placeholders are left unresolved so that a
//! template problem is visible in the delivered text instead of being
//! silently dropped.

use reengage_types::NonEmptyText;
use std::collections::BTreeMap;

/// Placeholder key for the patient's display name.
pub const FIELD_PATIENT_NAME: &str = "nome";

/// Placeholder key for the clinic's display name.
pub const FIELD_CLINIC_NAME: &str = "clinica";

/// Field map consumed by [`personalise`].
///
/// Ordered so that substitution runs in a deterministic key order.
pub type FieldMap = BTreeMap<String, String>;

/// Builds the standard field map for one recipient.
///
/// The clinic name is optional; when it is unknown the `{clinica}`
/// placeholder stays unresolved in the output.
pub fn standard_fields(patient_name: &NonEmptyText, clinic_name: Option<&NonEmptyText>) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(
        FIELD_PATIENT_NAME.to_owned(),
        patient_name.as_str().to_owned(),
    );
    if let Some(clinic) = clinic_name {
        fields.insert(FIELD_CLINIC_NAME.to_owned(), clinic.as_str().to_owned());
    }
    fields
}

/// Substitutes `{token}` placeholders with the matching field values.
///
/// Every occurrence of a recognised placeholder is replaced. Given the same
/// template and fields the substitution is idempotent, provided field
/// values do not themselves contain placeholder tokens.
pub fn personalise(template: &str, fields: &FieldMap) -> String {
    let mut output = template.to_owned();
    for (key, value) in fields {
        let token = format!("{{{key}}}");
        if output.contains(&token) {
            output = output.replace(&token, value);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_substitutes_known_placeholders() {
        let result = personalise(
            "Olá {nome}, a {clinica} espera por si.",
            &fields(&[("nome", "Ana"), ("clinica", "Clínica Aurora")]),
        );
        assert_eq!(result, "Olá Ana, a Clínica Aurora espera por si.");
    }

    #[test]
    fn test_substitutes_every_occurrence() {
        let result = personalise("{nome}, sim, {nome}!", &fields(&[("nome", "Rui")]));
        assert_eq!(result, "Rui, sim, Rui!");
    }

    #[test]
    fn test_unknown_placeholders_are_left_unresolved() {
        let result = personalise("Olá {nome}, código {codigo}.", &fields(&[("nome", "Ana")]));
        assert_eq!(result, "Olá Ana, código {codigo}.");
    }

    #[test]
    fn test_personalisation_is_idempotent() {
        let map = fields(&[("nome", "Ana"), ("clinica", "Clínica Aurora")]);
        let once = personalise("Olá {nome}, a {clinica} espera por si.", &map);
        let twice = personalise(&once, &map);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_template_without_placeholders_is_untouched() {
        let template = "Mensagem fixa, sem campos.";
        assert_eq!(personalise(template, &fields(&[("nome", "Ana")])), template);
    }

    #[test]
    fn test_standard_fields_omit_unknown_clinic() {
        let name = NonEmptyText::new("Ana Sousa").unwrap();
        let map = standard_fields(&name, None);
        assert_eq!(map.get(FIELD_PATIENT_NAME).unwrap(), "Ana Sousa");
        assert!(!map.contains_key(FIELD_CLINIC_NAME));

        let result = personalise("Olá {nome}, a {clinica} espera por si.", &map);
        assert_eq!(result, "Olá Ana Sousa, a {clinica} espera por si.");
    }
}
