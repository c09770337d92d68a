use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct User {
        pub id: i32,
        pub name: String,
    }
}

pub mod group {
    use super::*;

    /// Request body for creating a group.
    ///
    /// Unknown user ids are created on the fly.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub user_ids: Vec<i32>,
    }

    /// Request body for updating a group. Missing fields are left unchanged,
    /// `user_ids` replaces the whole member list.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GroupUpdate {
        pub name: Option<String>,
        pub user_ids: Option<Vec<i32>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Group {
        pub id: i32,
        pub name: String,
        pub user_ids: Vec<i32>,
        pub total_expenses: f64,
    }
}

pub mod expense {
    use super::*;

    /// A requested split.
    ///
    /// For percentage expenses `share` is a percentage of the amount.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitNew {
        pub user_id: i32,
        pub share: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: String,
        pub amount: f64,
        pub paid_by: i32,
        /// `equal` or `percentage`.
        pub split_type: String,
        pub splits: Option<Vec<SplitNew>>,
    }

    /// A stored split: `share` is always an absolute amount.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Split {
        pub user_id: i32,
        pub share: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Expense {
        pub id: i32,
        pub description: String,
        pub amount: f64,
        pub paid_by: i32,
        pub split_type: String,
        pub splits: Vec<Split>,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementNew {
        pub from_user: i32,
        pub to_user: i32,
        pub amount: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Settlement {
        pub id: i32,
        pub from_user: i32,
        pub to_user: i32,
        pub amount: f64,
        pub paid_at: DateTime<Utc>,
    }
}

pub mod chat {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatRequest {
        pub query: String,
        /// The user asking, used when the question names no group.
        pub user_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatResponse {
        pub answer: String,
    }
}
