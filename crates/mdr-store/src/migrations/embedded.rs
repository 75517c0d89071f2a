//! SQL shipped inside the binary, in application order

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

macro_rules! migration {
    ($id:literal) => {
        Migration {
            id: $id,
            sql: include_str!(concat!("../../migrations/", $id, ".sql")),
        }
    };
}

pub fn get_migrations() -> Vec<Migration> {
    vec![
        migration!("001_graph_schema"),
        migration!("002_edit_locks"),
        migration!("003_audit_trail"),
    ]
}
