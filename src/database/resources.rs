//! Table bindings for the resources served through the generic CRUD routes

use sqlx::{Postgres, QueryBuilder};

use crate::database::repositories::crud::{coalesce, Resource, SetList};
use crate::models::raffle::validate_ticket_range;
use crate::models::*;
use crate::utils::errors::Result;

impl Resource for Person {
    const TABLE: &'static str = "personas";
    const COLUMNS: &'static str = "id, first_name, last_name, document, email, phone, birth_date, address, estado, created_at, updated_at";
    const PATH: &'static str = "personas";
    const NAME: &'static str = "persona";

    type Create = CreatePersonRequest;
    type Update = UpdatePersonRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreatePersonRequest) {
        qb.push("(first_name, last_name, document, email, phone, birth_date, address) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.first_name.trim().to_string());
        values.push_bind(request.last_name.trim().to_string());
        values.push_bind(request.document);
        values.push_bind(request.email);
        values.push_bind(request.phone);
        values.push_bind(request.birth_date);
        values.push_bind(request.address);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdatePersonRequest) {
        coalesce(set, "first_name", request.first_name.map(|s| s.trim().to_string()));
        coalesce(set, "last_name", request.last_name.map(|s| s.trim().to_string()));
        coalesce(set, "document", request.document);
        coalesce(set, "email", request.email);
        coalesce(set, "phone", request.phone);
        coalesce(set, "birth_date", request.birth_date);
        coalesce(set, "address", request.address);
        coalesce(set, "estado", request.estado);
    }
}

impl Resource for Role {
    const TABLE: &'static str = "roles";
    const COLUMNS: &'static str = "id, name, description, estado, created_at, updated_at";
    const PATH: &'static str = "roles";
    const NAME: &'static str = "role";

    type Create = CreateRoleRequest;
    type Update = UpdateRoleRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreateRoleRequest) {
        qb.push("(name, description) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.name.trim().to_string());
        values.push_bind(request.description);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdateRoleRequest) {
        coalesce(set, "name", request.name.map(|s| s.trim().to_string()));
        coalesce(set, "description", request.description);
        coalesce(set, "estado", request.estado);
    }
}

impl Resource for Permission {
    const TABLE: &'static str = "permisos";
    const COLUMNS: &'static str = "id, name, description, estado, created_at, updated_at";
    const PATH: &'static str = "permisos";
    const NAME: &'static str = "permiso";

    type Create = CreatePermissionRequest;
    type Update = UpdatePermissionRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreatePermissionRequest) {
        qb.push("(name, description) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.name);
        values.push_bind(request.description);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdatePermissionRequest) {
        coalesce(set, "name", request.name);
        coalesce(set, "description", request.description);
        coalesce(set, "estado", request.estado);
    }
}

impl Resource for Volunteer {
    const TABLE: &'static str = "voluntarios";
    const COLUMNS: &'static str = "id, persona_id, skills, availability, joined_on, estado, created_at, updated_at";
    const PATH: &'static str = "voluntarios";
    const NAME: &'static str = "voluntario";

    type Create = CreateVolunteerRequest;
    type Update = UpdateVolunteerRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreateVolunteerRequest) {
        qb.push("(persona_id, skills, availability, joined_on) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.persona_id);
        values.push_bind(request.skills);
        values.push_bind(request.availability);
        values.push_bind(request.joined_on);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdateVolunteerRequest) {
        coalesce(set, "persona_id", request.persona_id);
        coalesce(set, "skills", request.skills);
        coalesce(set, "availability", request.availability);
        coalesce(set, "joined_on", request.joined_on);
        coalesce(set, "estado", request.estado);
    }
}

impl Resource for Event {
    const TABLE: &'static str = "eventos";
    const COLUMNS: &'static str = "id, name, description, location, starts_at, ends_at, image_path, estado, created_at, updated_at";
    const PATH: &'static str = "eventos";
    const NAME: &'static str = "evento";

    type Create = CreateEventRequest;
    type Update = UpdateEventRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreateEventRequest) {
        qb.push("(name, description, location, starts_at, ends_at) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.name.trim().to_string());
        values.push_bind(request.description);
        values.push_bind(request.location);
        values.push_bind(request.starts_at);
        values.push_bind(request.ends_at);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdateEventRequest) {
        coalesce(set, "name", request.name.map(|s| s.trim().to_string()));
        coalesce(set, "description", request.description);
        coalesce(set, "location", request.location);
        coalesce(set, "starts_at", request.starts_at);
        coalesce(set, "ends_at", request.ends_at);
        coalesce(set, "estado", request.estado);
    }

    fn check(&self) -> Result<()> {
        self.validate()
    }
}

impl Resource for Stand {
    const TABLE: &'static str = "stands";
    const COLUMNS: &'static str = "id, evento_id, name, description, location, estado, created_at, updated_at";
    const PATH: &'static str = "stands";
    const NAME: &'static str = "stand";

    type Create = CreateStandRequest;
    type Update = UpdateStandRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreateStandRequest) {
        qb.push("(evento_id, name, description, location) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.evento_id);
        values.push_bind(request.name.trim().to_string());
        values.push_bind(request.description);
        values.push_bind(request.location);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdateStandRequest) {
        coalesce(set, "evento_id", request.evento_id);
        coalesce(set, "name", request.name.map(|s| s.trim().to_string()));
        coalesce(set, "description", request.description);
        coalesce(set, "location", request.location);
        coalesce(set, "estado", request.estado);
    }
}

impl Resource for Product {
    const TABLE: &'static str = "productos";
    const COLUMNS: &'static str = "id, name, description, price_cents, stock, image_path, estado, created_at, updated_at";
    const PATH: &'static str = "productos";
    const NAME: &'static str = "producto";

    type Create = CreateProductRequest;
    type Update = UpdateProductRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreateProductRequest) {
        qb.push("(name, description, price_cents, stock) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.name.trim().to_string());
        values.push_bind(request.description);
        values.push_bind(request.price_cents);
        values.push_bind(request.stock);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdateProductRequest) {
        coalesce(set, "name", request.name.map(|s| s.trim().to_string()));
        coalesce(set, "description", request.description);
        coalesce(set, "price_cents", request.price_cents);
        coalesce(set, "stock", request.stock);
        coalesce(set, "estado", request.estado);
    }
}

impl Resource for InventoryItem {
    const TABLE: &'static str = "detalle_productos";
    const COLUMNS: &'static str = "id, stand_id, producto_id, quantity, estado, created_at, updated_at";
    const PATH: &'static str = "detalle_productos";
    const NAME: &'static str = "detalle_producto";

    type Create = CreateInventoryItemRequest;
    type Update = UpdateInventoryItemRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreateInventoryItemRequest) {
        qb.push("(stand_id, producto_id, quantity) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.stand_id);
        values.push_bind(request.producto_id);
        values.push_bind(request.quantity);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdateInventoryItemRequest) {
        coalesce(set, "quantity", request.quantity);
        coalesce(set, "estado", request.estado);
    }
}

impl Resource for Raffle {
    const TABLE: &'static str = "rifas";
    const COLUMNS: &'static str = "id, evento_id, name, description, prize, ticket_price_cents, draw_at, estado, created_at, updated_at";
    const PATH: &'static str = "rifas";
    const NAME: &'static str = "rifa";

    type Create = CreateRaffleRequest;
    type Update = UpdateRaffleRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreateRaffleRequest) {
        qb.push("(evento_id, name, description, prize, ticket_price_cents, draw_at) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.evento_id);
        values.push_bind(request.name.trim().to_string());
        values.push_bind(request.description);
        values.push_bind(request.prize);
        values.push_bind(request.ticket_price_cents);
        values.push_bind(request.draw_at);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdateRaffleRequest) {
        coalesce(set, "evento_id", request.evento_id);
        coalesce(set, "name", request.name.map(|s| s.trim().to_string()));
        coalesce(set, "description", request.description);
        coalesce(set, "prize", request.prize);
        coalesce(set, "ticket_price_cents", request.ticket_price_cents);
        coalesce(set, "draw_at", request.draw_at);
        coalesce(set, "estado", request.estado);
    }
}

impl Resource for TicketBook {
    const TABLE: &'static str = "talonarios";
    const COLUMNS: &'static str = "id, rifa_id, voluntario_id, first_number, last_number, sold_count, estado, created_at, updated_at";
    const PATH: &'static str = "talonarios";
    const NAME: &'static str = "talonario";

    type Create = CreateTicketBookRequest;
    type Update = UpdateTicketBookRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreateTicketBookRequest) {
        qb.push("(rifa_id, voluntario_id, first_number, last_number) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.rifa_id);
        values.push_bind(request.voluntario_id);
        values.push_bind(request.first_number);
        values.push_bind(request.last_number);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdateTicketBookRequest) {
        coalesce(set, "voluntario_id", request.voluntario_id);
        coalesce(set, "first_number", request.first_number);
        coalesce(set, "last_number", request.last_number);
        coalesce(set, "sold_count", request.sold_count);
        coalesce(set, "estado", request.estado);
    }

    fn check(&self) -> Result<()> {
        validate_ticket_range(self.first_number, self.last_number, self.sold_count)
    }
}

impl Resource for Notification {
    const TABLE: &'static str = "notificaciones";
    const COLUMNS: &'static str = "id, usuario_id, title, message, read_at, estado, created_at, updated_at";
    const PATH: &'static str = "notificaciones";
    const NAME: &'static str = "notificacion";

    type Create = CreateNotificationRequest;
    type Update = UpdateNotificationRequest;

    fn push_insert<'args>(qb: &mut QueryBuilder<'args, Postgres>, request: CreateNotificationRequest) {
        qb.push("(usuario_id, title, message) VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(request.usuario_id);
        values.push_bind(request.title);
        values.push_bind(request.message);
        values.push_unseparated(")");
    }

    fn push_update<'args>(set: &mut SetList<'_, 'args>, request: UpdateNotificationRequest) {
        coalesce(set, "title", request.title);
        coalesce(set, "message", request.message);
        coalesce(set, "estado", request.estado);
    }
}
