use sqlx::sqlite::SqliteRow;
use std::collections::HashMap;

use super::rows::{required, TableRecord};
use super::store::{id_param, EntityTable, Join, WritePayload};
use crate::backend::database::filter::{BindValue, Predicate};
use crate::error::AppResult;
use crate::models::{Board, Manager, ManagerView, Unity, UnityPayload, UnityView, UserSummary};

pub struct UnityTable;

/// Units can be narrowed to one board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnityScope {
    pub board_id: Option<i64>,
}

impl WritePayload for UnityPayload {
    fn columns(&self) -> Vec<(&'static str, Option<BindValue>)> {
        vec![
            ("manager_id", self.manager_id.map(BindValue::from)),
            ("board_id", self.board_id.map(BindValue::from)),
            ("name", self.name.clone().map(BindValue::from)),
            ("lat_lon", self.lat_lon.clone().map(BindValue::from)),
        ]
    }
}

impl EntityTable for UnityTable {
    type Record = Unity;
    type View = UnityView;
    type Payload = UnityPayload;
    type Scope = UnityScope;

    const ALIAS: &'static str = "u";
    const ORDER_BY: &'static str = "u.unity_id ASC";

    fn joins() -> Vec<Join> {
        vec![
            Join::belongs_to::<Manager>("managerUnity", "manager_unity", Self::ALIAS, "manager_id"),
            Join::belongs_to::<UserSummary>(
                "managerUnity.userManager",
                "manager_unity_user",
                "manager_unity",
                "user_id",
            ),
            Join::belongs_to::<Board>("boardUnity", "board_unity", Self::ALIAS, "board_id"),
        ]
    }

    fn search_paths() -> &'static [&'static str] {
        &[
            "unityId",
            "managerId",
            "boardId",
            "name",
            "latLon",
            "createdAt",
            "updatedAt",
            "managerUnity.userManager.name",
            "managerUnity.userManager.mail",
            "managerUnity.userManager.status",
            "boardUnity.name",
        ]
    }

    fn view_from_row(row: &SqliteRow) -> AppResult<UnityView> {
        let manager_unity = match Manager::from_prefixed_row(row, "manager_unity")? {
            Some(manager) => Some(ManagerView {
                manager,
                user_manager: UserSummary::from_prefixed_row(row, "manager_unity_user")?,
            }),
            None => None,
        };

        Ok(UnityView {
            unity: required(row)?,
            manager_unity,
            board_unity: Board::from_prefixed_row(row, "board_unity")?,
        })
    }

    fn scope_from_params(params: &HashMap<String, String>) -> UnityScope {
        UnityScope {
            board_id: id_param(params, "boardId"),
        }
    }

    fn scope_predicates(scope: &UnityScope) -> Vec<Predicate> {
        scope
            .board_id
            .map(|id| Predicate::eq("u.board_id", BindValue::Int(id)))
            .into_iter()
            .collect()
    }
}
