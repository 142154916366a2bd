use sqlx::sqlite::SqliteRow;

use super::rows::{required, TableRecord};
use super::store::{EntityTable, Join, WritePayload};
use crate::backend::database::filter::BindValue;
use crate::error::AppResult;
use crate::models::{Board, BoardPayload, BoardView, Director, DirectorView, UserSummary};

pub struct BoardTable;

impl WritePayload for BoardPayload {
    fn columns(&self) -> Vec<(&'static str, Option<BindValue>)> {
        vec![
            ("director_id", self.director_id.map(BindValue::from)),
            ("name", self.name.clone().map(BindValue::from)),
        ]
    }
}

impl EntityTable for BoardTable {
    type Record = Board;
    type View = BoardView;
    type Payload = BoardPayload;
    type Scope = ();

    const ALIAS: &'static str = "b";
    const ORDER_BY: &'static str = "b.board_id ASC";

    fn joins() -> Vec<Join> {
        vec![
            Join::belongs_to::<Director>("directorBoard", "director_board", Self::ALIAS, "director_id"),
            Join::belongs_to::<UserSummary>(
                "directorBoard.userDirector",
                "director_board_user",
                "director_board",
                "user_id",
            ),
        ]
    }

    fn search_paths() -> &'static [&'static str] {
        &[
            "boardId",
            "directorId",
            "name",
            "createdAt",
            "updatedAt",
            "directorBoard.userDirector.name",
        ]
    }

    fn view_from_row(row: &SqliteRow) -> AppResult<BoardView> {
        let director_board = match Director::from_prefixed_row(row, "director_board")? {
            Some(director) => Some(DirectorView {
                director,
                user_director: UserSummary::from_prefixed_row(row, "director_board_user")?,
            }),
            None => None,
        };

        Ok(BoardView {
            board: required(row)?,
            director_board,
        })
    }
}
