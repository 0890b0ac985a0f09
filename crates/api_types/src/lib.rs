//! Wire types shared by the HTTP server and its clients.
//!
//! Field names are camelCase on the wire to match what the web client
//! already sends and stores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod profile {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfileNew {
        pub email: String,
        pub display_name: String,
        pub currency: String,
        pub language: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfileUpdate {
        pub display_name: Option<String>,
        pub currency: Option<String>,
        pub language: Option<String>,
        pub budget_period: Option<String>,
        pub budget_start_date: Option<NaiveDate>,
        pub budget_end_date: Option<NaiveDate>,
        pub selected_budget_period_id: Option<String>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub date: NaiveDate,
        pub category: String,
        pub item_name: String,
        pub quantity: f64,
        pub unit: Option<String>,
        pub price: f64,
        pub currency: String,
        pub device: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseUpdate {
        pub date: Option<NaiveDate>,
        pub category: Option<String>,
        pub item_name: Option<String>,
        pub quantity: Option<f64>,
        pub unit: Option<String>,
        pub price: Option<f64>,
        pub currency: Option<String>,
        pub device: Option<String>,
    }
}

pub mod income {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeNew {
        pub date: NaiveDate,
        pub amount: f64,
        pub currency: String,
        pub description: Option<String>,
        pub device: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeUpdate {
        pub date: Option<NaiveDate>,
        pub amount: Option<f64>,
        pub currency: Option<String>,
        pub description: Option<String>,
        pub device: Option<String>,
    }
}

pub mod budget {
    use super::*;

    /// Period token format depends on the type: ISO date for the weekly
    /// start, `YYYY-MM` for monthly, a year for yearly.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetNew {
        pub budget_type: String,
        pub period: String,
        pub amount: f64,
        pub currency: String,
        pub device: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetUpdate {
        pub budget_type: Option<String>,
        pub period: Option<String>,
        pub amount: Option<f64>,
        pub currency: Option<String>,
        pub device: Option<String>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryRename {
        pub name: String,
    }
}

pub mod period {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetPeriodNew {
        pub name: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupJoin {
        pub invite_code: String,
    }
}

pub mod membership {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MemberView {
        pub uid: String,
        pub role: String,
        pub email: String,
        pub display_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod invitation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvitationNew {
        pub email: String,
    }

    /// `email_sent` reports the mailer side effect; the invitation record
    /// exists either way.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InvitationResponse {
        pub id: Uuid,
        pub email: String,
        pub status: String,
        pub email_sent: bool,
    }
}

pub mod summary {
    use super::*;

    /// Query parameters for the dashboard summary.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SummaryQuery {
        pub range: String,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }
}
