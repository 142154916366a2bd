use sqlx::sqlite::SqliteRow;
use std::collections::HashMap;

use super::rows::{required, TableRecord};
use super::store::{id_param, EntityTable, Join, WritePayload};
use crate::backend::database::filter::{BindValue, Predicate};
use crate::error::AppResult;
use crate::models::{Seller, SellerPayload, SellerView, Unity, UserSummary};

pub struct SellerTable;

/// Sellers can be narrowed to one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellerScope {
    pub unity_id: Option<i64>,
}

impl WritePayload for SellerPayload {
    fn columns(&self) -> Vec<(&'static str, Option<BindValue>)> {
        vec![
            ("user_id", self.user_id.map(BindValue::from)),
            ("unity_id", self.unity_id.map(BindValue::from)),
        ]
    }
}

impl EntityTable for SellerTable {
    type Record = Seller;
    type View = SellerView;
    type Payload = SellerPayload;
    type Scope = SellerScope;

    const ALIAS: &'static str = "s";
    const ORDER_BY: &'static str = "s.seller_id ASC";

    fn joins() -> Vec<Join> {
        vec![
            Join::belongs_to::<UserSummary>("userSeller", "user_seller", Self::ALIAS, "user_id"),
            Join::belongs_to::<Unity>("unitySeller", "unity_seller", Self::ALIAS, "unity_id"),
        ]
    }

    fn search_paths() -> &'static [&'static str] {
        &[
            "sellerId",
            "userId",
            "unityId",
            "createdAt",
            "updatedAt",
            "unitySeller.name",
            "userSeller.name",
            "userSeller.mail",
            "userSeller.status",
        ]
    }

    fn view_from_row(row: &SqliteRow) -> AppResult<SellerView> {
        Ok(SellerView {
            seller: required(row)?,
            user_seller: UserSummary::from_prefixed_row(row, "user_seller")?,
            unity_seller: Unity::from_prefixed_row(row, "unity_seller")?,
        })
    }

    fn scope_from_params(params: &HashMap<String, String>) -> SellerScope {
        SellerScope {
            unity_id: id_param(params, "unityId"),
        }
    }

    fn scope_predicates(scope: &SellerScope) -> Vec<Predicate> {
        scope
            .unity_id
            .map(|id| Predicate::eq("s.unity_id", BindValue::Int(id)))
            .into_iter()
            .collect()
    }
}
