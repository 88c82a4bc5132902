//! Request validation rules and their client-facing translations
//!
//! Structural checks (`required`, non-empty) come from `validator` derives on
//! the request DTOs. Domain rules such as the mainland China mobile number
//! format are registered here by name, and each DTO declares which rules
//! apply to which of its fields. Every failure becomes one
//! `BadRequest.FieldViolation`, in the order the DTO declares its fields.

use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

use otp_core::CODE_LENGTH;
use otp_shared::phone::is_cn_cell_phone_number;
use otp_shared::{ErrorDetail, Language};

/// Rule names
pub const RULE_CN_CELL_PHONE_NUMBER: &str = "cn_cell_phone_number";
pub const RULE_OTP_CODE: &str = "otp_code";

/// Validation code for a missing or empty field
pub const CODE_REQUIRED: &str = "required";

/// A named check over a field's text value
pub type Rule = fn(&str) -> bool;

/// The registry rules that apply to one request field
#[derive(Debug, Clone)]
pub struct FieldRules<'a> {
    /// JSON field name
    pub field: &'static str,
    pub value: Option<&'a str>,
    pub rules: &'static [&'static str],
}

/// A request whose fields are checked against registry rules
pub trait ValidatedRequest: Validate {
    /// Fields in declaration order with the rules bound to each
    fn field_rules(&self) -> Vec<FieldRules<'_>>;
}

/// Named validation rules plus per-language message templates
///
/// Built once at startup and shared read-only between workers. In a template
/// `{0}` stands for the field name.
pub struct ValidatorRegistry {
    rules: HashMap<&'static str, Rule>,
    translations: HashMap<(Language, &'static str), &'static str>,
}

impl ValidatorRegistry {
    /// An empty registry
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
            translations: HashMap::new(),
        }
    }

    /// Registry with the built-in rules and translations
    pub fn new() -> Self {
        Self::empty()
            .register_rule(RULE_CN_CELL_PHONE_NUMBER, is_cn_cell_phone_number)
            .register_rule(RULE_OTP_CODE, is_otp_code)
            .register_translation(Language::Chinese, CODE_REQUIRED, "{0}为必填字段")
            .register_translation(
                Language::Chinese,
                RULE_CN_CELL_PHONE_NUMBER,
                "{0}必须是有效的11位中国大陆手机号",
            )
            .register_translation(Language::Chinese, RULE_OTP_CODE, "{0}必须是6位数字验证码")
            .register_translation(Language::English, CODE_REQUIRED, "{0} is a required field")
            .register_translation(
                Language::English,
                RULE_CN_CELL_PHONE_NUMBER,
                "{0} must be a valid 11-digit mainland China mobile number",
            )
            .register_translation(
                Language::English,
                RULE_OTP_CODE,
                "{0} must be a 6-digit verification code",
            )
    }

    pub fn register_rule(mut self, name: &'static str, rule: Rule) -> Self {
        self.rules.insert(name, rule);
        self
    }

    pub fn register_translation(
        mut self,
        language: Language,
        code: &'static str,
        template: &'static str,
    ) -> Self {
        self.translations.insert((language, code), template);
        self
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Client-facing description of a failed validation `code` on `field`
    pub fn translate(&self, language: Language, code: &str, field: &str) -> String {
        match self.translations.get(&(language, code)) {
            Some(template) => template.replace("{0}", field),
            None => match language {
                Language::Chinese => format!("{}校验失败: {}", field, code),
                Language::English => format!("{} failed validation: {}", field, code),
            },
        }
    }

    /// Validate `request`, returning one field violation per failing field
    pub fn validate<T: ValidatedRequest>(
        &self,
        request: &T,
        language: Language,
    ) -> Result<(), Vec<ErrorDetail>> {
        let structural = request.validate().err();
        let mut violations = Vec::new();
        let declared = request.field_rules();

        for field_rules in &declared {
            if let Some(code) = structural
                .as_ref()
                .and_then(|errors| first_error_code(errors, field_rules.field))
            {
                violations.push(ErrorDetail::field_violation(
                    field_rules.field,
                    self.translate(language, &code, field_rules.field),
                ));
                continue;
            }

            let Some(value) = field_rules.value else {
                continue;
            };

            for name in field_rules.rules {
                let passed = match self.rules.get(name) {
                    Some(rule) => rule(value),
                    None => {
                        tracing::error!(rule = name, "Validation rule is not registered");
                        false
                    }
                };
                if !passed {
                    violations.push(ErrorDetail::field_violation(
                        field_rules.field,
                        self.translate(language, name, field_rules.field),
                    ));
                    break;
                }
            }
        }

        // Structural failures on fields without declared rules, by field name
        if let Some(errors) = &structural {
            let mut rest: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .filter(|field| !declared.iter().any(|d| d.field == field.as_str()))
                .collect();
            rest.sort_unstable();
            for field in rest {
                if let Some(code) = first_error_code(errors, &field) {
                    let description = self.translate(language, &code, &field);
                    violations.push(ErrorDetail::field_violation(field, description));
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn first_error_code(errors: &ValidationErrors, field: &str) -> Option<String> {
    errors
        .field_errors()
        .get(field)
        .and_then(|errors| errors.first())
        .map(|error| error.code.to_string())
}

/// Exactly six ASCII digits
pub fn is_otp_code(value: &str) -> bool {
    value.len() == CODE_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}
