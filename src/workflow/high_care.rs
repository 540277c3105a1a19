//! Input rules for the high-care clearance steps

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ApprovalStatus,
        high_care::{CreateHighCareRequest, NewHighCareRequest, SubmitHealthDeclaration},
    },
};

/// Trim codes, drop blanks and duplicates (first occurrence wins, case-insensitive)
pub fn normalize_codes(codes: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        if !out.iter().any(|seen| seen.eq_ignore_ascii_case(code)) {
            out.push(code.to_string());
        }
    }
    out
}

/// Build the clearance row for `visit_id`. Visits already blocked or
/// cancelled cannot be cleared.
pub fn build_request(
    visit_id: i32,
    approval: ApprovalStatus,
    nurse_id: i32,
    data: &CreateHighCareRequest,
) -> AppResult<NewHighCareRequest> {
    if approval.is_terminal() {
        return Err(AppError::InvalidTransition(format!(
            "Visit {} is '{}' and cannot be cleared",
            visit_id, approval
        )));
    }

    let permission_type = data
        .permission_type
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("permissionType is required".to_string()))?;

    let comments = data
        .comments
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(NewHighCareRequest {
        visit_id,
        nurse_id,
        areas: normalize_codes(&data.areas),
        equipment: normalize_codes(&data.equipment),
        permission_type: permission_type.to_string(),
        comments,
    })
}

/// Size bound on a declaration so a client cannot store arbitrarily large documents
pub fn check_declaration_size(data: &SubmitHealthDeclaration, max_answers: usize) -> AppResult<()> {
    if data.symptoms.len() > max_answers || data.prohibited_items.len() > max_answers {
        return Err(AppError::Validation(format!(
            "A declaration may hold at most {} answers per section",
            max_answers
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::high_care::DeclarationAnswer;

    fn request(areas: &[&str], permission: Option<&str>) -> CreateHighCareRequest {
        CreateHighCareRequest {
            nurse_id: None,
            areas: areas.iter().map(|s| s.to_string()).collect(),
            equipment: vec!["Gloves".into(), " gloves ".into(), "Mask".into()],
            permission_type: permission.map(str::to_string),
            comments: Some("   ".into()),
        }
    }

    #[test]
    fn test_normalize_codes() {
        let codes = vec![" DC".to_string(), "".to_string(), "dc".to_string(), "QA".to_string()];
        assert_eq!(normalize_codes(&codes), vec!["DC".to_string(), "QA".to_string()]);
    }

    #[test]
    fn test_build_request() {
        let new = build_request(
            5,
            ApprovalStatus::PartialApproved,
            2,
            &request(&["DC"], Some("CLEAR WITH RECTAL")),
        )
        .unwrap();
        assert_eq!(new.areas, vec!["DC".to_string()]);
        assert_eq!(new.equipment, vec!["Gloves".to_string(), "Mask".to_string()]);
        assert_eq!(new.permission_type, "CLEAR WITH RECTAL");
        assert_eq!(new.comments, None);
    }

    #[test]
    fn test_build_request_rejects_terminal_visits() {
        let err = build_request(5, ApprovalStatus::Cancelled, 2, &request(&["DC"], Some("X")))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn test_build_request_requires_permission_type() {
        let err = build_request(5, ApprovalStatus::WaitingForApproval, 2, &request(&[], Some(" ")))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_declaration_size_limit() {
        let answer = DeclarationAnswer {
            question: "Fever?".into(),
            answer: false,
            remarks: None,
        };
        let data = SubmitHealthDeclaration {
            nurse_id: None,
            symptoms: vec![answer.clone(); 3],
            prohibited_items: vec![answer],
        };
        assert!(check_declaration_size(&data, 3).is_ok());
        assert!(check_declaration_size(&data, 2).is_err());
    }
}
