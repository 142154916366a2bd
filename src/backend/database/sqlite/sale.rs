use sqlx::sqlite::SqliteRow;
use std::collections::HashMap;

use super::rows::{required, TableRecord};
use super::store::{id_param, EntityTable, Join, WritePayload};
use crate::backend::database::filter::{BindValue, Predicate};
use crate::error::AppResult;
use crate::models::{
    Board, Manager, ManagerView, Sale, SalePayload, SaleSeller, SaleView, Seller, Unity,
    UserSummary,
};

pub struct SaleTable;

/// Owning-entity filters for sale searches.
///
/// The date range only applies when both ends are given; dates compare as
/// text, so they must share the stored `YYYY-MM-DD` layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleScope {
    pub seller_id: Option<i64>,
    pub board_id: Option<i64>,
    pub unity_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub start_date: Option<String>,
    pub final_date: Option<String>,
}

impl WritePayload for SalePayload {
    fn columns(&self) -> Vec<(&'static str, Option<BindValue>)> {
        vec![
            ("seller_id", self.seller_id.map(BindValue::from)),
            ("board_id", self.board_id.map(BindValue::from)),
            ("unity_id", self.unity_id.map(BindValue::from)),
            ("manager_id", self.manager_id.map(BindValue::from)),
            ("amount", self.amount.map(BindValue::from)),
            ("location", self.location.clone().map(BindValue::from)),
            ("date", self.date.clone().map(BindValue::from)),
            ("status", self.status.clone().map(BindValue::from)),
        ]
    }
}

impl EntityTable for SaleTable {
    type Record = Sale;
    type View = SaleView;
    type Payload = SalePayload;
    type Scope = SaleScope;

    const ALIAS: &'static str = "sa";
    const ORDER_BY: &'static str = "sa.date DESC, sa.sale_id DESC";

    fn joins() -> Vec<Join> {
        vec![
            Join::belongs_to::<Seller>("sellerSale", "seller_sale", Self::ALIAS, "seller_id"),
            Join::belongs_to::<UserSummary>(
                "sellerSale.userSeller",
                "seller_sale_user",
                "seller_sale",
                "user_id",
            ),
            Join::belongs_to::<Board>("boardSale", "board_sale", Self::ALIAS, "board_id"),
            Join::belongs_to::<Unity>("unitySale", "unity_sale", Self::ALIAS, "unity_id"),
            Join::belongs_to::<Manager>("managerSale", "manager_sale", Self::ALIAS, "manager_id"),
            Join::belongs_to::<UserSummary>(
                "managerSale.userManager",
                "manager_sale_user",
                "manager_sale",
                "user_id",
            ),
        ]
    }

    fn search_paths() -> &'static [&'static str] {
        &[
            "saleId",
            "sellerId",
            "boardId",
            "unityId",
            "managerId",
            "date",
            "amount",
            "location",
            "status",
            "createdAt",
            "updatedAt",
            "sellerSale.userSeller.name",
            "sellerSale.userSeller.mail",
            "sellerSale.userSeller.status",
            "boardSale.name",
            "unitySale.name",
        ]
    }

    fn view_from_row(row: &SqliteRow) -> AppResult<SaleView> {
        let seller_sale = match Seller::from_prefixed_row(row, "seller_sale")? {
            Some(seller) => Some(SaleSeller {
                seller,
                user_seller: UserSummary::from_prefixed_row(row, "seller_sale_user")?,
            }),
            None => None,
        };
        let manager_sale = match Manager::from_prefixed_row(row, "manager_sale")? {
            Some(manager) => Some(ManagerView {
                manager,
                user_manager: UserSummary::from_prefixed_row(row, "manager_sale_user")?,
            }),
            None => None,
        };

        Ok(SaleView {
            sale: required(row)?,
            seller_sale,
            board_sale: Board::from_prefixed_row(row, "board_sale")?,
            unity_sale: Unity::from_prefixed_row(row, "unity_sale")?,
            manager_sale,
        })
    }

    fn scope_from_params(params: &HashMap<String, String>) -> SaleScope {
        let date = |name: &str| {
            params
                .get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        SaleScope {
            seller_id: id_param(params, "sellerId"),
            board_id: id_param(params, "boardId"),
            unity_id: id_param(params, "unityId"),
            manager_id: id_param(params, "managerId"),
            start_date: date("startDate"),
            final_date: date("finalDate"),
        }
    }

    fn scope_predicates(scope: &SaleScope) -> Vec<Predicate> {
        let mut predicates: Vec<Predicate> = [
            ("sa.seller_id", scope.seller_id),
            ("sa.board_id", scope.board_id),
            ("sa.unity_id", scope.unity_id),
            ("sa.manager_id", scope.manager_id),
        ]
        .into_iter()
        .filter_map(|(column, id)| id.map(|id| Predicate::eq(column, BindValue::Int(id))))
        .collect();

        if let (Some(start), Some(end)) = (&scope.start_date, &scope.final_date) {
            predicates.push(Predicate::between(
                "sa.date",
                BindValue::from(start.as_str()),
                BindValue::from(end.as_str()),
            ));
        }

        predicates
    }
}
