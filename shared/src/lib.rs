use serde::{Deserialize, Serialize};

/// An income category as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCategory {
    pub id: i64,
    /// Stable key used to match postings and categories across requests
    pub code: String,
    /// Display name (1-32 characters)
    pub title: String,
    /// Share of every income routed to this category (0-100)
    pub percent: u32,
    /// Display ordering, also the order of allocation lines
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCategoryListResponse {
    pub categories: Vec<IncomeCategory>,
    /// Sum of all category percents; anything other than 100 deserves a warning
    pub total_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIncomeCategoryRequest {
    pub title: String,
    /// Defaults to 0 when omitted
    #[serde(default)]
    pub percent: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateIncomeCategoryRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub percent: Option<u32>,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCategoryResponse {
    pub category: IncomeCategory,
    pub total_percent: u32,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteIncomeCategoryResponse {
    pub deleted_id: i64,
    pub total_percent: u32,
    pub success_message: String,
}

/// One category's share of an income amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationItem {
    pub code: String,
    pub title: String,
    pub percent: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub amount: f64,
    pub allocations: Vec<AllocationItem>,
    pub total_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub amount: f64,
}

/// Result of committing an allocation to the ledger.
///
/// On a partial failure `ok` is false, `applied` lists the lines that were
/// written, `failed` the line whose write failed and `not_attempted` the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmResponse {
    pub ok: bool,
    pub applied: Vec<AllocationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<AllocationItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_attempted: Vec<AllocationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Confirmed categories whose savings goal is now reached
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reached_goals: Vec<CategoryBalance>,
}

/// Running total of confirmed allocations for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBalance {
    pub code: String,
    /// Current title, or the code when the category no longer exists
    pub title: String,
    pub amount: f64,
    pub postings: u32,
    /// Zero when no savings goal is set
    pub goal: f64,
    pub purpose: String,
    /// Percent of the goal saved so far, 0-100
    pub progress: u32,
    pub goal_reached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBalancesResponse {
    pub balances: Vec<CategoryBalance>,
}

/// Set the savings goal of a category. A goal of zero clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSavingsGoalRequest {
    pub category_code: String,
    pub goal: f64,
    #[serde(default)]
    pub purpose: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoalResponse {
    pub balance: CategoryBalance,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetSavingsGoalsResponse {
    pub reset_count: u64,
    pub success_message: String,
}

/// A single confirmed allocation line as stored in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerPosting {
    pub id: String,
    pub category_code: String,
    pub amount: f64,
    pub posted_at: String,
    /// Shared by all postings written by the same confirm
    pub batch_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerPostingListRequest {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerPostingListResponse {
    pub postings: Vec<LedgerPosting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_response_omits_empty_failure_fields() {
        let response = ConfirmResponse {
            ok: true,
            applied: vec![AllocationItem {
                code: "save".to_string(),
                title: "Savings".to_string(),
                percent: 60,
                amount: 600.0,
            }],
            failed: None,
            not_attempted: Vec::new(),
            error: None,
            reached_goals: Vec::new(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["applied"][0]["code"], "save");
        assert!(json.get("failed").is_none());
        assert!(json.get("not_attempted").is_none());
        assert!(json.get("error").is_none());
        assert!(json.get("reached_goals").is_none());
    }

    #[test]
    fn test_goal_purpose_defaults_to_empty() {
        let request: SetSavingsGoalRequest =
            serde_json::from_str(r#"{"category_code": "inc_1", "goal": 250.0}"#).unwrap();
        assert_eq!(request.category_code, "inc_1");
        assert_eq!(request.goal, 250.0);
        assert!(request.purpose.is_empty());
    }

    #[test]
    fn test_update_request_fields_are_optional() {
        let request: UpdateIncomeCategoryRequest =
            serde_json::from_str(r#"{"percent": 25}"#).unwrap();
        assert_eq!(request.percent, Some(25));
        assert_eq!(request.title, None);
        assert_eq!(request.position, None);
    }

    #[test]
    fn test_create_request_without_percent() {
        let request: CreateIncomeCategoryRequest =
            serde_json::from_str(r#"{"title": "Travel"}"#).unwrap();
        assert_eq!(request.title, "Travel");
        assert_eq!(request.percent, None);
    }
}
