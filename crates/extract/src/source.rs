//! Reading the catalog out of Postgres.
//!
//! One `PgConnection` is opened per run and every statement goes through it.
//! All result sets are fully materialized with `fetch_all`.
//!
//! Columns are cast explicitly in SQL so decoding does not depend on the
//! exact integer widths the source schema was created with.

use sqlx::{Connection, PgConnection};
use tracing::{debug, info, warn};

use catalog::{ActorRoleRow, MemberRow, MovieRow};

use crate::config::PostgresConfig;
use crate::error::{ExtractError, Result};

const MEMBERS_SQL: &str = "\
SELECT id::int8 AS id,
       name::text AS name,
       birthyear::int4 AS birthyear,
       deathyear::int4 AS deathyear
  FROM member
 ORDER BY id";

// Association tables are aggregated with correlated sub-selects, so the
// row set is decided by `MovieScope` alone.
const MOVIE_COLUMNS_SQL: &str = "\
SELECT m.id::int8 AS id,
       m.type::text AS kind,
       m.title::text AS title,
       m.originaltitle::text AS originaltitle,
       m.startyear::int4 AS startyear,
       m.endyear::int4 AS endyear,
       m.runtime::int4 AS runtime,
       m.avgrating::float8 AS avgrating,
       m.numvotes::int8 AS numvotes,
       (SELECT array_agg(DISTINCT g.name::text) FILTER (WHERE g.name IS NOT NULL)
          FROM movie_genre mg
          JOIN genre g ON g.id = mg.genre
         WHERE mg.movie = m.id) AS genres,
       (SELECT array_agg(DISTINCT md.director::int8)
          FROM movie_director md
         WHERE md.movie = m.id) AS directors,
       (SELECT array_agg(DISTINCT mw.writer::int8)
          FROM movie_writer mw
         WHERE mw.movie = m.id) AS writers,
       (SELECT array_agg(DISTINCT mp.producer::int8)
          FROM movie_producer mp
         WHERE mp.movie = m.id) AS producers
  FROM movie m";

const COMPLETE_MOVIES_FILTER: &str = "\
 WHERE EXISTS (SELECT 1
                 FROM movie_genre mg
                 JOIN genre g ON g.id = mg.genre
                WHERE mg.movie = m.id)
   AND EXISTS (SELECT 1 FROM movie_director md WHERE md.movie = m.id)
   AND EXISTS (SELECT 1 FROM movie_writer mw WHERE mw.movie = m.id)
   AND EXISTS (SELECT 1 FROM movie_producer mp WHERE mp.movie = m.id)
   AND EXISTS (SELECT 1 FROM actor_movie_role amr WHERE amr.movie = m.id)";

// A role id with no `role` row still keeps its actor, with no role names.
const ACTOR_ROLES_SQL: &str = "\
SELECT amr.movie::int8 AS movie,
       amr.actor::int8 AS actor,
       array_agg(DISTINCT r.name::text) FILTER (WHERE r.name IS NOT NULL) AS roles
  FROM actor_movie_role amr
  LEFT JOIN role r ON r.id = amr.role
 GROUP BY amr.movie, amr.actor
 ORDER BY amr.movie, amr.actor";

// Resolved through the search path exactly like the ALTER below.
const COLUMN_TYPE_SQL: &str = "\
SELECT format_type(a.atttypid, a.atttypmod)
  FROM pg_attribute a
 WHERE a.attrelid = to_regclass($1)
   AND a.attname = $2
   AND NOT a.attisdropped";

const FLOAT_RATING_SQL: &str = "ALTER TABLE movie ALTER COLUMN avgrating TYPE float";

/// How `format_type` spells `float` / `float8`.
const FLOAT_TYPE: &str = "double precision";

/// Outcome of [`PgSource::ensure_float_rating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaChange {
    /// The column was converted during this run
    Altered,
    /// The column was already `double precision`; nothing was run
    AlreadyFloat,
}

/// Which movie rows [`PgSource::movies`] returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MovieScope {
    /// Only movies with at least one genre, director, writer, producer and
    /// cast row
    #[default]
    Complete,
    /// Every row of `movie`; missing associations become absent fields
    All,
}

impl MovieScope {
    fn sql(self) -> String {
        match self {
            MovieScope::Complete => {
                format!("{}\n{}\n ORDER BY m.id", MOVIE_COLUMNS_SQL, COMPLETE_MOVIES_FILTER)
            }
            MovieScope::All => format!("{}\n ORDER BY m.id", MOVIE_COLUMNS_SQL),
        }
    }
}

/// The relational side of the migration.
pub struct PgSource {
    conn: PgConnection,
}

impl PgSource {
    /// Validate `config` and open the connection.
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Connecting to Postgres database {} on {}:{}",
            config.database, config.host, config.port
        );

        let conn = PgConnection::connect_with(&config.connect_options())
            .await
            .map_err(|source| ExtractError::Connect {
                host: config.host.clone(),
                port: config.port,
                database: config.database.clone(),
                source,
            })?;

        Ok(Self { conn })
    }

    /// Wrap an already-open connection.
    pub fn from_connection(conn: PgConnection) -> Self {
        Self { conn }
    }

    /// Convert `movie.avgrating` to floating point unless it already is.
    ///
    /// The column type is read first; a column that is already
    /// `double precision` is left alone, so reruns do not fail here.
    pub async fn ensure_float_rating(&mut self) -> Result<SchemaChange> {
        let current = sqlx::query_scalar::<_, String>(COLUMN_TYPE_SQL)
            .bind("movie")
            .bind("avgrating")
            .fetch_optional(&mut self.conn)
            .await
            .map_err(ExtractError::query("avgrating column type"))?;

        let current = current.ok_or(ExtractError::MissingColumn {
            table: "movie",
            column: "avgrating",
        })?;

        if current == FLOAT_TYPE {
            warn!("movie.avgrating is already {}, skipping ALTER", FLOAT_TYPE);
            return Ok(SchemaChange::AlreadyFloat);
        }

        info!("Altering movie.avgrating from {} to {}", current, FLOAT_TYPE);
        sqlx::query(FLOAT_RATING_SQL)
            .execute(&mut self.conn)
            .await
            .map_err(ExtractError::query("alter avgrating"))?;

        Ok(SchemaChange::Altered)
    }

    /// Every row of the `member` table.
    pub async fn members(&mut self) -> Result<Vec<MemberRow>> {
        let rows = sqlx::query_as::<_, MemberRow>(MEMBERS_SQL)
            .fetch_all(&mut self.conn)
            .await
            .map_err(ExtractError::query("select members"))?;

        debug!("Fetched {} member rows", rows.len());
        Ok(rows)
    }

    /// Movies in `scope` with their genre names and director/writer/producer ids.
    pub async fn movies(&mut self, scope: MovieScope) -> Result<Vec<MovieRow>> {
        let sql = scope.sql();
        let rows = sqlx::query_as::<_, MovieRow>(&sql)
            .fetch_all(&mut self.conn)
            .await
            .map_err(ExtractError::query("select movies"))?;

        debug!("Fetched {} movie rows ({:?})", rows.len(), scope);
        Ok(rows)
    }

    /// All (movie, actor, role names) groups in a single round trip.
    pub async fn actor_roles(&mut self) -> Result<Vec<ActorRoleRow>> {
        let rows = sqlx::query_as::<_, ActorRoleRow>(ACTOR_ROLES_SQL)
            .fetch_all(&mut self.conn)
            .await
            .map_err(ExtractError::query("select actor roles"))?;

        debug!("Fetched {} (movie, actor) role groups", rows.len());
        Ok(rows)
    }

    /// Close the connection cleanly.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(ExtractError::query("close connection"))
    }
}
