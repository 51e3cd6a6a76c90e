//! Ticket book queries and raffle summaries

use sqlx::{PgConnection, PgPool};

use crate::models::{Raffle, RaffleSummary, TicketBook, ESTADO_ACTIVO};
use crate::utils::errors::Result;

const TICKET_BOOK_COLUMNS: &str =
    "id, rifa_id, voluntario_id, first_number, last_number, sold_count, estado, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct RaffleRepository {
    pool: PgPool,
}

impl RaffleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ticket_books_by_raffle(&self, rifa_id: i64) -> Result<Vec<TicketBook>> {
        let books = sqlx::query_as::<_, TicketBook>(&format!(
            "SELECT {TICKET_BOOK_COLUMNS} FROM talonarios WHERE rifa_id = $1 ORDER BY first_number"
        ))
        .bind(rifa_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    pub async fn ticket_books_by_volunteer(&self, voluntario_id: i64) -> Result<Vec<TicketBook>> {
        let books = sqlx::query_as::<_, TicketBook>(&format!(
            "SELECT {TICKET_BOOK_COLUMNS} FROM talonarios WHERE voluntario_id = $1 ORDER BY rifa_id, first_number"
        ))
        .bind(voluntario_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Ticket counts and money collected for one raffle
    pub async fn summary(&self, rifa_id: i64) -> Result<RaffleSummary> {
        let summary = sqlx::query_as::<_, RaffleSummary>(
            r#"
            SELECT r.id AS rifa_id,
                   COUNT(t.id) AS ticket_books,
                   COALESCE(SUM(t.last_number - t.first_number + 1), 0)::BIGINT AS tickets_assigned,
                   COALESCE(SUM(t.sold_count), 0)::BIGINT AS tickets_sold,
                   (COALESCE(SUM(t.sold_count), 0) * r.ticket_price_cents)::BIGINT AS amount_collected_cents
            FROM rifas r
            LEFT JOIN talonarios t ON t.rifa_id = r.id AND t.estado = $2
            WHERE r.id = $1
            GROUP BY r.id, r.ticket_price_cents
            "#,
        )
        .bind(rifa_id)
        .bind(ESTADO_ACTIVO)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Lock a raffle row for the rest of the transaction
    pub async fn lock_raffle(conn: &mut PgConnection, rifa_id: i64) -> Result<Option<Raffle>> {
        let raffle = sqlx::query_as::<_, Raffle>(
            r#"
            SELECT id, evento_id, name, description, prize, ticket_price_cents, draw_at, estado, created_at, updated_at
            FROM rifas
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(rifa_id)
        .fetch_optional(conn)
        .await?;

        Ok(raffle)
    }

    pub async fn lock_ticket_book(conn: &mut PgConnection, id: i64) -> Result<Option<TicketBook>> {
        let book = sqlx::query_as::<_, TicketBook>(&format!(
            "SELECT {TICKET_BOOK_COLUMNS} FROM talonarios WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(book)
    }

    /// First active ticket book of the raffle whose range intersects `first..=last`
    pub async fn find_overlapping(
        conn: &mut PgConnection,
        rifa_id: i64,
        first: i64,
        last: i64,
        exclude_id: Option<i64>,
    ) -> Result<Option<TicketBook>> {
        let book = sqlx::query_as::<_, TicketBook>(&format!(
            r#"
            SELECT {TICKET_BOOK_COLUMNS}
            FROM talonarios
            WHERE rifa_id = $1
              AND estado = $2
              AND first_number <= $4
              AND $3 <= last_number
              AND ($5::BIGINT IS NULL OR id <> $5)
            ORDER BY first_number
            LIMIT 1
            "#
        ))
        .bind(rifa_id)
        .bind(ESTADO_ACTIVO)
        .bind(first)
        .bind(last)
        .bind(exclude_id)
        .fetch_optional(conn)
        .await?;

        Ok(book)
    }

    /// Add sold tickets to a book
    pub async fn add_sold(conn: &mut PgConnection, id: i64, quantity: i64) -> Result<TicketBook> {
        let book = sqlx::query_as::<_, TicketBook>(&format!(
            r#"
            UPDATE talonarios
            SET sold_count = sold_count + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TICKET_BOOK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(quantity)
        .fetch_one(conn)
        .await?;

        Ok(book)
    }
}
