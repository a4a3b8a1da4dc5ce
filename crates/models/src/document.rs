use std::{fmt, path::Path, str::FromStr};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, mechanic};

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];
pub const INVALID_FILE_TYPE: &str = "Invalid file type. Allowed types: PDF, JPG, PNG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[sea_orm(string_value = "passport")]
    #[serde(alias = "PASSPORT")]
    Passport,
    #[sea_orm(string_value = "tax_id")]
    #[serde(alias = "TAX_ID")]
    TaxId,
    #[sea_orm(string_value = "diploma")]
    #[serde(alias = "DIPLOMA")]
    Diploma,
    #[sea_orm(string_value = "employment_contract")]
    #[serde(alias = "EMPLOYMENT_CONTRACT")]
    EmploymentContract,
}

impl Default for DocumentType {
    fn default() -> Self { DocumentType::Passport }
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Passport => "passport",
            DocumentType::TaxId => "tax_id",
            DocumentType::Diploma => "diploma",
            DocumentType::EmploymentContract => "employment_contract",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse used for multipart form fields.
impl FromStr for DocumentType {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passport" => Ok(DocumentType::Passport),
            "tax_id" => Ok(DocumentType::TaxId),
            "diploma" => Ok(DocumentType::Diploma),
            "employment_contract" => Ok(DocumentType::EmploymentContract),
            other => Err(errors::ModelError::Validation(format!("Unknown document type: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub mechanic_id: i32,
    pub document_type: DocumentType,
    pub file_path: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Mechanic,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Mechanic => Entity::belongs_to(mechanic::Entity).from(Column::MechanicId).to(mechanic::Column::Id).into(),
        }
    }
}

impl Related<mechanic::Entity> for Entity {
    fn to() -> RelationDef { Relation::Mechanic.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Accept only the allow-listed extensions, compared case-insensitively.
pub fn ensure_allowed_extension(file_name: &str) -> Result<(), errors::ModelError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(e) if ALLOWED_EXTENSIONS.contains(&e.as_str()) => Ok(()),
        _ => Err(errors::ModelError::Validation(INVALID_FILE_TYPE.into())),
    }
}
