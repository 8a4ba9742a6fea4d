use sqlx::mysql::MySqlDatabaseError;

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

/// Splits `Duplicate entry '<value>' for key '<table>.<index>'` into the
/// indexed field and the offending value. Index names follow `uq_<table>_<field>`.
pub fn parse_dup_entry(message: &str) -> Option<(String, String)> {
    let rest = message.strip_prefix("Duplicate entry '")?;
    let (value, rest) = rest.rsplit_once("' for key '")?;
    let key = rest.strip_suffix('\'')?;

    let index = key.rsplit('.').next().unwrap_or(key);
    let field = index
        .strip_prefix("uq_")
        .and_then(|s| s.split_once('_'))
        .map(|(_, field)| field)
        .unwrap_or(index);

    Some((field.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mysql8_message() {
        let parsed = parse_dup_entry("Duplicate entry 'Kettle' for key 'product.uq_product_name'");
        assert_eq!(parsed, Some(("name".to_string(), "Kettle".to_string())));
    }

    #[test]
    fn keeps_quotes_inside_value() {
        let parsed = parse_dup_entry("Duplicate entry 'Bob's Mug' for key 'uq_product_name'");
        assert_eq!(parsed, Some(("name".to_string(), "Bob's Mug".to_string())));
    }

    #[test]
    fn unknown_index_name_is_used_verbatim() {
        let parsed = parse_dup_entry("Duplicate entry 'x' for key 'product.sku'");
        assert_eq!(parsed, Some(("sku".to_string(), "x".to_string())));
    }

    #[test]
    fn rejects_other_messages() {
        assert_eq!(parse_dup_entry("Deadlock found"), None);
    }
}
