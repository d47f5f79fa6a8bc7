//! Form validation for master data and project forms.
//!
//! Failures are reported per field with the message shown inline under the
//! input; nothing here returns an error to the caller.

use crate::util::{parse_date_safe, parse_f64_safe};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
// Indonesian numbers: optional +62 / 62 / 0 prefix, 8 to 13 digits after it.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+62|62|0)8[0-9]{7,12}$").expect("valid phone regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulates field errors; only the first error per field is kept.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    fn push(&mut self, field: &str, message: String) {
        if !self.errors.iter().any(|e| e.field == field) {
            self.errors.push(FieldError {
                field: field.to_string(),
                message,
            });
        }
    }

    pub fn required(&mut self, field: &str, label: &str, value: Option<&str>) -> &mut Self {
        if value.map_or(true, |v| v.trim().is_empty()) {
            self.push(field, format!("{} wajib diisi", label));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !EMAIL_RE.is_match(v) {
                self.push(field, "Format email tidak valid".to_string());
            }
        }
        self
    }

    pub fn phone(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            let compact: String = v.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
            if !PHONE_RE.is_match(&compact) {
                self.push(field, "Format nomor telepon tidak valid".to_string());
            }
        }
        self
    }

    pub fn number_in_range(
        &mut self,
        field: &str,
        label: &str,
        value: Option<&str>,
        min: f64,
        max: Option<f64>,
    ) -> &mut Self {
        let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
            return self;
        };
        match parse_f64_safe(Some(raw)) {
            None => self.push(field, format!("{} harus berupa angka", label)),
            Some(n) if n < min => self.push(field, format!("{} minimal {}", label, min)),
            Some(n) if max.is_some_and(|m| n > m) => {
                self.push(field, format!("{} maksimal {}", label, max.unwrap_or(n)))
            }
            Some(_) => {}
        }
        self
    }

    /// Both dates must parse and `end` may not precede `start`.
    pub fn date_range(
        &mut self,
        start_field: &str,
        start: Option<&str>,
        end_field: &str,
        end: Option<&str>,
    ) -> &mut Self {
        let s = parse_date_safe(start);
        let e = parse_date_safe(end);
        if start.is_some_and(|v| !v.trim().is_empty()) && s.is_none() {
            self.push(start_field, "Format tanggal tidak valid".to_string());
        }
        if end.is_some_and(|v| !v.trim().is_empty()) && e.is_none() {
            self.push(end_field, "Format tanggal tidak valid".to_string());
        }
        if let (Some(s), Some(e)) = (s, e) {
            if e < s {
                self.push(
                    end_field,
                    "Tanggal selesai harus setelah tanggal mulai".to_string(),
                );
            }
        }
        self
    }

    pub fn finish(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors)
    }
}

/// Raw form input: field name to the text the user typed.
pub type FormValues = HashMap<String, String>;

fn get<'a>(form: &'a FormValues, field: &str) -> Option<&'a str> {
    form.get(field).map(String::as_str)
}

pub fn validate_project_form(form: &FormValues) -> Vec<FieldError> {
    Validator::default()
        .required("name", "Nama proyek", get(form, "name"))
        .required("client", "Klien", get(form, "client"))
        .required("province", "Provinsi", get(form, "province"))
        .required("budget", "Anggaran", get(form, "budget"))
        .number_in_range("budget", "Anggaran", get(form, "budget"), 1.0, None)
        .number_in_range("progress", "Progres", get(form, "progress"), 0.0, Some(100.0))
        .required("startDate", "Tanggal mulai", get(form, "startDate"))
        .required("endDate", "Tanggal selesai", get(form, "endDate"))
        .date_range("startDate", get(form, "startDate"), "endDate", get(form, "endDate"))
        .finish()
}

pub fn validate_client_form(form: &FormValues) -> Vec<FieldError> {
    Validator::default()
        .required("name", "Nama klien", get(form, "name"))
        .required("email", "Email", get(form, "email"))
        .email("email", get(form, "email"))
        .phone("phone", get(form, "phone"))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_project_form() {
        let f = form(&[
            ("name", "Jalan Tol"),
            ("client", "PT Jasa Marga"),
            ("province", "Jawa Barat"),
            ("budget", "1,500,000"),
            ("progress", "45"),
            ("startDate", "2024-01-01"),
            ("endDate", "2024-12-31"),
        ]);
        assert!(validate_project_form(&f).is_empty());
    }

    #[test]
    fn test_project_form_errors() {
        let f = form(&[
            ("name", "  "),
            ("client", "PT A"),
            ("province", "Bali"),
            ("budget", "abc"),
            ("progress", "120"),
            ("startDate", "2024-06-01"),
            ("endDate", "2024-01-01"),
        ]);
        let errors = validate_project_form(&f);
        assert_eq!(fields(&errors), vec!["name", "budget", "progress", "endDate"]);
        assert_eq!(errors[0].message, "Nama proyek wajib diisi");
        assert_eq!(errors[1].message, "Anggaran harus berupa angka");
        assert_eq!(errors[2].message, "Progres maksimal 100");
    }

    #[test]
    fn test_client_form_email_and_phone() {
        let ok = form(&[
            ("name", "Pemprov Bali"),
            ("email", "info@baliprov.go.id"),
            ("phone", "0812-3456-7890"),
        ]);
        assert!(validate_client_form(&ok).is_empty());

        let bad = form(&[("name", "X"), ("email", "info@"), ("phone", "12345")]);
        let errors = validate_client_form(&bad);
        assert_eq!(fields(&errors), vec!["email", "phone"]);
        assert_eq!(errors[0].message, "Format email tidak valid");
    }

    #[test]
    fn test_only_first_error_per_field() {
        let errors = validate_client_form(&form(&[("name", "X")]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Email wajib diisi");
    }
}
