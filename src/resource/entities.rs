use super::{Resource, ResourceLabels};
use crate::backend::database::sqlite::{
    BoardTable, DirectorTable, EntityStore, ManagerTable, SaleTable, SellerTable, UnityTable,
};
use crate::backend::SqliteBackend;

pub struct Directors;
pub struct Boards;
pub struct Managers;
pub struct Units;
pub struct Sellers;
pub struct Sales;

impl Resource for Directors {
    type Table = DirectorTable;
    const LABELS: ResourceLabels = ResourceLabels {
        singular: "director",
        plural: "directors",
        title: "Director",
        area: "DIRECTORS",
        count_key: "countDirectors",
    };
    const PUBLIC_CREATE: bool = true;

    fn store(backend: &SqliteBackend) -> &EntityStore<DirectorTable> {
        &backend.directors
    }
}

impl Resource for Boards {
    type Table = BoardTable;
    const LABELS: ResourceLabels = ResourceLabels {
        singular: "board",
        plural: "boards",
        title: "Board",
        area: "BOARDS",
        count_key: "countBoards",
    };
    const PUBLIC_CREATE: bool = false;

    fn store(backend: &SqliteBackend) -> &EntityStore<BoardTable> {
        &backend.boards
    }
}

impl Resource for Managers {
    type Table = ManagerTable;
    const LABELS: ResourceLabels = ResourceLabels {
        singular: "manager",
        plural: "managers",
        title: "Manager",
        area: "MANAGERS",
        count_key: "countManagers",
    };
    const PUBLIC_CREATE: bool = true;

    fn store(backend: &SqliteBackend) -> &EntityStore<ManagerTable> {
        &backend.managers
    }
}

impl Resource for Units {
    type Table = UnityTable;
    const LABELS: ResourceLabels = ResourceLabels {
        singular: "unity",
        plural: "units",
        title: "Unity",
        area: "UNITS",
        count_key: "countUnits",
    };
    const PUBLIC_CREATE: bool = false;

    fn store(backend: &SqliteBackend) -> &EntityStore<UnityTable> {
        &backend.units
    }
}

impl Resource for Sellers {
    type Table = SellerTable;
    const LABELS: ResourceLabels = ResourceLabels {
        singular: "seller",
        plural: "sellers",
        title: "Seller",
        area: "SELLERS",
        count_key: "countSellers",
    };
    const PUBLIC_CREATE: bool = true;

    fn store(backend: &SqliteBackend) -> &EntityStore<SellerTable> {
        &backend.sellers
    }
}

impl Resource for Sales {
    type Table = SaleTable;
    const LABELS: ResourceLabels = ResourceLabels {
        singular: "sale",
        plural: "sales",
        title: "Sale",
        area: "SALES",
        count_key: "countSales",
    };
    const PUBLIC_CREATE: bool = true;

    fn store(backend: &SqliteBackend) -> &EntityStore<SaleTable> {
        &backend.sales
    }
}
