/// Relational mapping of an entity: the table it lives in. The table name
/// doubles as the alias used by the query builder.
pub trait Entity {
    const TABLE_NAME: &'static str;
}
