//! SQL compilation of keyword predicates and embedding blob encoding.

use scmd_protocols::{CommandRecord, Embedding, KeywordPredicate, StoreError};

use crate::schema::FOLD_FUNCTION;

pub(crate) const SELECT_COLUMNS: &str = "SELECT id, key, data, embedding FROM commands";

/// A row as read from SQLite, before the embedding is decoded.
pub(crate) type RawRow = (i64, String, String, Option<Vec<u8>>);

/// Compile a predicate to SQL plus positional parameters.
///
/// Each word becomes an `instr` containment test over the folded
/// `key || ' ' || data`; words of a clause are AND-ed, clauses OR-ed.
pub(crate) fn build_search_query(predicate: &KeywordPredicate) -> (String, Vec<String>) {
    let mut sql = String::from(SELECT_COLUMNS);
    let mut params = Vec::new();

    if !predicate.is_match_all() {
        let mut clauses = Vec::with_capacity(predicate.clauses().len());
        for clause in predicate.clauses() {
            let mut words = Vec::with_capacity(clause.len());
            for word in clause {
                params.push(word.to_lowercase());
                words.push(format!(
                    "instr({}(key || ' ' || data), ?{}) > 0",
                    FOLD_FUNCTION,
                    params.len()
                ));
            }
            clauses.push(format!("({})", words.join(" AND ")));
        }
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" OR "));
    }

    sql.push_str(" ORDER BY id");
    (sql, params)
}

pub(crate) fn encode_embedding(embedding: &Embedding) -> Vec<u8> {
    embedding
        .as_slice()
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect()
}

pub(crate) fn decode_embedding(id: i64, bytes: &[u8]) -> Result<Embedding, StoreError> {
    if bytes.len() % 4 != 0 {
        return Err(StoreError::Decode {
            id,
            message: format!("embedding blob has {} bytes", bytes.len()),
        });
    }
    let vector = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(Embedding::new(vector))
}

pub(crate) fn into_record(row: RawRow) -> Result<CommandRecord, StoreError> {
    let (id, key, data, blob) = row;
    let embedding = blob.map(|b| decode_embedding(id, &b)).transpose()?;
    Ok(CommandRecord {
        id,
        key,
        data,
        embedding,
    })
}

pub(crate) fn read_row(row: &rusqlite::Row<'_>) -> Result<RawRow, rusqlite::Error> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}
