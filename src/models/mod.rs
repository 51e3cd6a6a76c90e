//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod person;
pub mod user;
pub mod role;
pub mod volunteer;
pub mod event;
pub mod product;
pub mod transfer;
pub mod order;
pub mod sale;
pub mod raffle;
pub mod notification;
pub mod report;
pub mod lines;

// Re-export commonly used models
pub use person::{Person, CreatePersonRequest, UpdatePersonRequest};
pub use user::{User, CreateUserRequest, UpdateUserRequest, ChangePasswordRequest, LoginRequest, LoginResponse};
pub use role::{Role, Permission, CreateRoleRequest, UpdateRoleRequest, CreatePermissionRequest, UpdatePermissionRequest, AssignPermissionsRequest};
pub use volunteer::{Volunteer, CreateVolunteerRequest, UpdateVolunteerRequest, StandAssignment, AssignVolunteerRequest};
pub use event::{Event, Stand, CreateEventRequest, UpdateEventRequest, CreateStandRequest, UpdateStandRequest};
pub use product::{Product, InventoryItem, InventoryLine, CreateProductRequest, UpdateProductRequest, CreateInventoryItemRequest, UpdateInventoryItemRequest};
pub use transfer::{Transfer, TransferKind, TransferLine, TransferWithLines, TransferRequest};
pub use order::{Order, OrderLine, OrderWithLines, OrderRequest};
pub use sale::{line_subtotal, Sale, SaleLine, SaleWithLines, SaleRequest};
pub use raffle::{Raffle, TicketBook, RaffleSummary, CreateRaffleRequest, UpdateRaffleRequest, CreateTicketBookRequest, UpdateTicketBookRequest, SellTicketsRequest};
pub use notification::{Notification, CreateNotificationRequest, UpdateNotificationRequest};
pub use report::{StandSalesRow, InventoryValueRow};
pub use lines::LineInput;

use crate::utils::errors::{ColectaError, Result};

/// `estado` value of an active row
pub const ESTADO_ACTIVO: i16 = 1;
/// `estado` value of a soft-deleted row
pub const ESTADO_INACTIVO: i16 = 0;

/// Request payload validation
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// `estado` may only be toggled between the two known values
pub fn validate_estado(estado: Option<i16>) -> Result<()> {
    match estado {
        None | Some(ESTADO_ACTIVO) | Some(ESTADO_INACTIVO) => Ok(()),
        Some(other) => Err(ColectaError::validation(format!(
            "estado must be {} or {}, got {}",
            ESTADO_ACTIVO, ESTADO_INACTIVO, other
        ))),
    }
}
