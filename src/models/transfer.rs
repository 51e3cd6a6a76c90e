//! Inventory transfer (`traslado`) models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lines::{validate_lines, LineInput};
use super::Validate;
use crate::utils::errors::Result;
use crate::utils::helpers::optional_text;

/// Direction of a transfer relative to the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferKind {
    /// Goods leave the warehouse
    Enviado,
    /// Goods enter the warehouse
    Recibido,
}

impl TransferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::Enviado => "Enviado",
            TransferKind::Recibido => "Recibido",
        }
    }

    /// Sign applied to warehouse stock for each line
    pub fn stock_sign(&self) -> i64 {
        match self {
            TransferKind::Enviado => -1,
            TransferKind::Recibido => 1,
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Enviado" => Ok(TransferKind::Enviado),
            "Recibido" => Ok(TransferKind::Recibido),
            other => Err(format!("unknown transfer kind '{}'", other)),
        }
    }
}

impl TryFrom<String> for TransferKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transfer {
    pub id: i64,
    #[sqlx(try_from = "String")]
    pub kind: TransferKind,
    pub counterpart: Option<String>,
    pub description: Option<String>,
    pub transferred_at: DateTime<Utc>,
    pub estado: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransferLine {
    pub id: i64,
    pub traslado_id: i64,
    pub producto_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferWithLines {
    #[serde(flatten)]
    pub transfer: Transfer,
    pub detalles: Vec<TransferLine>,
}

/// Body of both create and update; on update lines carry their `id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub kind: TransferKind,
    pub counterpart: Option<String>,
    pub description: Option<String>,
    pub transferred_at: Option<DateTime<Utc>>,
    pub detalles: Vec<LineInput>,
}

impl Validate for TransferRequest {
    fn validate(&self) -> Result<()> {
        optional_text("counterpart", self.counterpart.as_deref(), 200)?;
        optional_text("description", self.description.as_deref(), 1000)?;
        validate_lines(&self.detalles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Enviado".parse::<TransferKind>(), Ok(TransferKind::Enviado));
        assert_eq!(TransferKind::try_from("Recibido".to_string()), Ok(TransferKind::Recibido));
        assert!("enviado".parse::<TransferKind>().is_err());
        assert_eq!(TransferKind::Enviado.stock_sign(), -1);
        assert_eq!(TransferKind::Recibido.to_string(), "Recibido");
    }

    #[test]
    fn test_kind_json_representation() {
        let request: TransferRequest = serde_json::from_value(serde_json::json!({
            "kind": "Recibido",
            "counterpart": "Banco de alimentos",
            "detalles": [{"producto_id": 3, "quantity": 10}]
        }))
        .unwrap();
        assert_eq!(request.kind, TransferKind::Recibido);
        assert_eq!(request.detalles[0].id, None);
        assert!(request.validate().is_ok());
    }
}
