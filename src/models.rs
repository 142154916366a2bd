use serde::{Deserialize, Serialize};

// Stored records. Every reference column is a soft reference, so each one
// may hold an id that no longer (or never did) exist.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    pub director_id: i64,
    pub user_id: Option<i64>,
    pub general_manager: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub board_id: i64,
    pub director_id: Option<i64>,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub manager_id: i64,
    pub user_id: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unity {
    pub unity_id: i64,
    pub manager_id: Option<i64>,
    pub board_id: Option<i64>,
    pub name: Option<String>,
    pub lat_lon: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub seller_id: i64,
    pub user_id: Option<i64>,
    pub unity_id: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub sale_id: i64,
    pub seller_id: Option<i64>,
    pub board_id: Option<i64>,
    pub unity_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub amount: Option<f64>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Account data owned by the user directory. Read-only from this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: i64,
    pub name: Option<String>,
    pub mail: Option<String>,
    pub status: Option<String>,
}

// Request bodies. Every field is optional: create stores absent fields as
// NULL, update leaves them untouched.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectorPayload {
    pub user_id: Option<i64>,
    pub general_manager: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardPayload {
    pub director_id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerPayload {
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnityPayload {
    pub manager_id: Option<i64>,
    pub board_id: Option<i64>,
    pub name: Option<String>,
    pub lat_lon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SellerPayload {
    pub user_id: Option<i64>,
    pub unity_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalePayload {
    pub seller_id: Option<i64>,
    pub board_id: Option<i64>,
    pub unity_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub amount: Option<f64>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

// Denormalised read views. Each nested object is named after the
// association alias and is null when the referenced row is missing.

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorView {
    #[serde(flatten)]
    pub director: Director,
    pub user_director: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    #[serde(flatten)]
    pub board: Board,
    pub director_board: Option<DirectorView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerView {
    #[serde(flatten)]
    pub manager: Manager,
    pub user_manager: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnityView {
    #[serde(flatten)]
    pub unity: Unity,
    pub manager_unity: Option<ManagerView>,
    pub board_unity: Option<Board>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerView {
    #[serde(flatten)]
    pub seller: Seller,
    pub user_seller: Option<UserSummary>,
    pub unity_seller: Option<Unity>,
}

/// The seller attached to a sale, carrying only its user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSeller {
    #[serde(flatten)]
    pub seller: Seller,
    pub user_seller: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    #[serde(flatten)]
    pub sale: Sale,
    pub seller_sale: Option<SaleSeller>,
    pub board_sale: Option<Board>,
    pub unity_sale: Option<Unity>,
    pub manager_sale: Option<ManagerView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_board_view_flattens_record() {
        let view = BoardView {
            board: Board {
                board_id: 1,
                director_id: Some(1),
                name: Some("North".to_string()),
                created_at: Some("2023-01-01 10:00:00".to_string()),
                updated_at: Some("2023-01-01 10:00:00".to_string()),
            },
            director_board: Some(DirectorView {
                director: Director {
                    director_id: 1,
                    user_id: Some(7),
                    general_manager: Some("N".to_string()),
                    created_at: None,
                    updated_at: None,
                },
                user_director: Some(UserSummary {
                    user_id: 7,
                    name: Some("Alice".to_string()),
                    mail: Some("alice@example.com".to_string()),
                    status: Some("active".to_string()),
                }),
            }),
        };

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["boardId"], 1);
        assert_eq!(value["name"], "North");
        assert_eq!(value["directorBoard"]["generalManager"], "N");
        assert_eq!(value["directorBoard"]["userDirector"]["name"], "Alice");
    }

    #[test]
    fn test_missing_association_serializes_as_null() {
        let view = ManagerView {
            manager: Manager {
                manager_id: 3,
                user_id: Some(99),
                created_at: None,
                updated_at: None,
            },
            user_manager: None,
        };

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["managerId"], 3);
        assert!(value["userManager"].is_null());
    }

    #[test]
    fn test_payload_fields_are_optional() {
        let payload: SalePayload = serde_json::from_value(json!({
            "sellerId": 2,
            "amount": 10.5,
            "date": "2023-01-10"
        }))
        .unwrap();

        assert_eq!(payload.seller_id, Some(2));
        assert_eq!(payload.amount, Some(10.5));
        assert_eq!(payload.manager_id, None);
        assert_eq!(payload.status, None);
    }
}
