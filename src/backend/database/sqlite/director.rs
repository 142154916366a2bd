use sqlx::sqlite::SqliteRow;

use super::rows::{required, TableRecord};
use super::store::{EntityTable, Join, WritePayload};
use crate::backend::database::filter::BindValue;
use crate::error::AppResult;
use crate::models::{Director, DirectorPayload, DirectorView, UserSummary};

pub struct DirectorTable;

impl WritePayload for DirectorPayload {
    fn columns(&self) -> Vec<(&'static str, Option<BindValue>)> {
        vec![
            ("user_id", self.user_id.map(BindValue::from)),
            ("general_manager", self.general_manager.clone().map(BindValue::from)),
        ]
    }
}

impl EntityTable for DirectorTable {
    type Record = Director;
    type View = DirectorView;
    type Payload = DirectorPayload;
    type Scope = ();

    const ALIAS: &'static str = "d";
    const ORDER_BY: &'static str = "d.director_id ASC";

    fn joins() -> Vec<Join> {
        vec![Join::belongs_to::<UserSummary>(
            "userDirector",
            "user_director",
            Self::ALIAS,
            "user_id",
        )]
    }

    fn search_paths() -> &'static [&'static str] {
        &[
            "directorId",
            "userId",
            "generalManager",
            "createdAt",
            "updatedAt",
            "userDirector.name",
            "userDirector.mail",
            "userDirector.status",
        ]
    }

    fn view_from_row(row: &SqliteRow) -> AppResult<DirectorView> {
        Ok(DirectorView {
            director: required(row)?,
            user_director: UserSummary::from_prefixed_row(row, "user_director")?,
        })
    }
}
