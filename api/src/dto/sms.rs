use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{FieldRules, ValidatedRequest, RULE_CN_CELL_PHONE_NUMBER, RULE_OTP_CODE};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// 11-digit mainland China mobile number, e.g. "13812345678"
    #[validate(required, length(min = 1, code = "required"))]
    pub cn_cell_phone_number: Option<String>,
}

impl ValidatedRequest for SendCodeRequest {
    fn field_rules(&self) -> Vec<FieldRules<'_>> {
        vec![FieldRules {
            field: "cn_cell_phone_number",
            value: self.cn_cell_phone_number.as_deref(),
            rules: &[RULE_CN_CELL_PHONE_NUMBER],
        }]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(required, length(min = 1, code = "required"))]
    pub cn_cell_phone_number: Option<String>,

    /// 6-digit verification code
    #[validate(required, length(min = 1, code = "required"))]
    pub code: Option<String>,
}

impl ValidatedRequest for VerifyCodeRequest {
    fn field_rules(&self) -> Vec<FieldRules<'_>> {
        vec![
            FieldRules {
                field: "cn_cell_phone_number",
                value: self.cn_cell_phone_number.as_deref(),
                rules: &[RULE_CN_CELL_PHONE_NUMBER],
            },
            FieldRules {
                field: "code",
                value: self.code.as_deref(),
                rules: &[RULE_OTP_CODE],
            },
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub verified: bool,
}
