use super::db::Db;
use super::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const CONTACT_COLUMNS: &str = "id, young_id, nom, prenom, lien_parente, adresse, telephone, email";
const INSERT_CONTACT: &str = "INSERT INTO young_contacts (young_id, nom, prenom, lien_parente, adresse, telephone, email)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const UPDATE_CONTACT: &str = "UPDATE young_contacts SET nom = ?2, prenom = ?3, lien_parente = ?4, adresse = ?5,
    telephone = ?6, email = ?7 WHERE id = ?1";
const DELETE_CONTACT: &str = "DELETE FROM young_contacts WHERE id = ?1";

/// A family member or other contact of a resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Option<i64>,
    pub young_id: i64,
    pub last_name: String,
    pub first_name: Option<String>,
    pub relationship: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Contact {
    pub fn new(young_id: i64, last_name: &str) -> Self {
        Self {
            id: None,
            young_id,
            last_name: last_name.to_string(),
            first_name: None,
            relationship: None,
            address: None,
            phone: None,
            email: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            young_id: row.get(1)?,
            last_name: row.get(2)?,
            first_name: row.get(3)?,
            relationship: row.get(4)?,
            address: row.get(5)?,
            phone: row.get(6)?,
            email: row.get(7)?,
        })
    }
}

pub struct Contacts<'a> {
    conn: &'a Connection,
}

impl<'a> Contacts<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    pub fn list_for_young(&self, young_id: i64) -> StoreResult<Vec<Contact>> {
        let sql = format!(
            "SELECT {} FROM young_contacts WHERE young_id = ?1 ORDER BY nom, prenom",
            CONTACT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let contacts = stmt.query_map(params![young_id], Contact::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<Contact>> {
        let sql = format!("SELECT {} FROM young_contacts WHERE id = ?1", CONTACT_COLUMNS);
        Ok(self.conn.query_row(&sql, params![id], Contact::from_row).optional()?)
    }

    pub fn insert(&self, contact: &Contact) -> StoreResult<i64> {
        self.conn.execute(
            INSERT_CONTACT,
            params![
                contact.young_id,
                contact.last_name,
                contact.first_name,
                contact.relationship,
                contact.address,
                contact.phone,
                contact.email
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&self, id: i64, contact: &Contact) -> StoreResult<()> {
        let affected = self.conn.execute(
            UPDATE_CONTACT,
            params![
                id,
                contact.last_name,
                contact.first_name,
                contact.relationship,
                contact.address,
                contact.phone,
                contact.email
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("contact", id));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        if self.conn.execute(DELETE_CONTACT, params![id])? == 0 {
            return Err(StoreError::not_found("contact", id));
        }
        Ok(())
    }
}
