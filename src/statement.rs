//! DDL/DML builders for the table-creation handoff.
//!
//! Only the table name is quoted; column names are interpolated unquoted,
//! so a header containing a reserved word or a space is rejected by the
//! engine, not here. Every cell is emitted as a quoted string literal (or
//! bare `NULL`) regardless of the declared column type; the engine's
//! implicit cast from string to the declared type does the coercion.

use itertools::Itertools;

use crate::data::{Cell, RecordSet};
use crate::schema::ColumnSpec;

/// Builds `CREATE TABLE "<name>" (<col> <TYPE>, ...);` in header order.
pub fn build_create_table(table_name: &str, columns: &[ColumnSpec]) -> String {
    let definitions = columns
        .iter()
        .map(|column| format!("{} {}", column.name, column.datatype))
        .join(", ");
    format!("CREATE TABLE \"{table_name}\" ({definitions});")
}

/// Builds one multi-row `INSERT INTO "<name>" VALUES (...), (...);` for the
/// whole record set.
pub fn build_insert(table_name: &str, records: &RecordSet) -> String {
    let rows = records
        .rows()
        .iter()
        .map(|row| format!("({})", row.iter().map(sql_literal).join(", ")))
        .join(", ");
    format!("INSERT INTO \"{table_name}\" VALUES {rows};")
}

/// Renders one cell as a SQL literal: bare `NULL` for a null cell, else a
/// single-quoted string with every embedded quote doubled.
pub fn sql_literal(cell: &Cell) -> String {
    match cell {
        Cell::Null => "NULL".to_string(),
        Cell::Text(value) => format!("'{}'", value.replace('\'', "''")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    #[test]
    fn create_table_quotes_name_but_not_columns() {
        let columns = vec![
            ColumnSpec::new("id", ColumnType::Integer),
            ColumnSpec::new("amount", ColumnType::Double),
            ColumnSpec::new("flag", ColumnType::Boolean),
        ];
        assert_eq!(
            build_create_table("t", &columns),
            "CREATE TABLE \"t\" (id INTEGER, amount DOUBLE, flag BOOLEAN);"
        );
    }

    #[test]
    fn sql_literal_doubles_every_embedded_quote() {
        assert_eq!(sql_literal(&Cell::from_field("O'Brien")), "'O''Brien'");
        assert_eq!(sql_literal(&Cell::from_field("a'b'c")), "'a''b''c'");
    }

    #[test]
    fn sql_literal_emits_bare_null() {
        assert_eq!(sql_literal(&Cell::Null), "NULL");
    }

    #[test]
    fn insert_covers_all_rows_in_one_statement() {
        let mut records = RecordSet::new(vec!["id".to_string(), "name".to_string()]);
        records.push_row(vec![Cell::from_field("1"), Cell::from_field("alpha")]);
        records.push_row(vec![Cell::from_field("2"), Cell::Null]);

        assert_eq!(
            build_insert("t", &records),
            "INSERT INTO \"t\" VALUES ('1', 'alpha'), ('2', NULL);"
        );
    }
}
