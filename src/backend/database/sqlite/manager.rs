use sqlx::sqlite::SqliteRow;

use super::rows::{required, TableRecord};
use super::store::{EntityTable, Join, WritePayload};
use crate::backend::database::filter::BindValue;
use crate::error::AppResult;
use crate::models::{Manager, ManagerPayload, ManagerView, UserSummary};

pub struct ManagerTable;

impl WritePayload for ManagerPayload {
    fn columns(&self) -> Vec<(&'static str, Option<BindValue>)> {
        vec![("user_id", self.user_id.map(BindValue::from))]
    }
}

impl EntityTable for ManagerTable {
    type Record = Manager;
    type View = ManagerView;
    type Payload = ManagerPayload;
    type Scope = ();

    const ALIAS: &'static str = "m";
    const ORDER_BY: &'static str = "m.manager_id ASC";

    fn joins() -> Vec<Join> {
        vec![Join::belongs_to::<UserSummary>(
            "userManager",
            "user_manager",
            Self::ALIAS,
            "user_id",
        )]
    }

    fn search_paths() -> &'static [&'static str] {
        &[
            "managerId",
            "userId",
            "createdAt",
            "updatedAt",
            "userManager.name",
            "userManager.mail",
            "userManager.status",
        ]
    }

    fn view_from_row(row: &SqliteRow) -> AppResult<ManagerView> {
        Ok(ManagerView {
            manager: required(row)?,
            user_manager: UserSummary::from_prefixed_row(row, "user_manager")?,
        })
    }
}
