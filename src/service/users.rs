//! Traced user lookup.

use std::time::{Duration, Instant};

use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::SdkTracer;

use crate::observability::{Instruments, PoolGauges, PoolStats, ScopedSpan, Telemetry};
use crate::store::{StoreError, UserStore, SELECT_NAME_BY_ID};

/// Query kind label attached to the query duration histogram.
pub const QUERY_KIND: &str = "SELECT user";

pub const LOOKUP_SPAN: &str = "fetchUserByID";
pub const QUERY_SPAN: &str = "SQL SELECT";

/// Business logic for resolving a user id to a name.
#[derive(Clone)]
pub struct UserService {
    store: UserStore,
    tracer: SdkTracer,
    instruments: Instruments,
    processing_delay: Duration,
    _pool_gauges: PoolGauges,
}

impl UserService {
    /// Also starts reporting the store's pool occupancy on `telemetry`'s meter.
    pub fn new(store: UserStore, telemetry: &Telemetry, processing_delay: Duration) -> Self {
        let pool = store.clone();
        let pool_gauges = telemetry.observe_pool(move || PoolStats {
            open: u64::from(pool.connections()),
            idle: pool.idle_connections() as u64,
        });

        Self {
            store,
            tracer: telemetry.db_tracer().clone(),
            instruments: telemetry.instruments().clone(),
            processing_delay,
            _pool_gauges: pool_gauges,
        }
    }

    /// Resolve `id` to a name inside a lookup span that is a child of `parent`.
    ///
    /// The simulated processing delay and the query both run inside the span.
    pub async fn fetch_user_by_id(&self, parent: &Context, id: &str) -> Result<String, StoreError> {
        let mut span = ScopedSpan::start(&self.tracer, parent, LOOKUP_SPAN);
        span.set_attribute(KeyValue::new("user.id", id.to_string()));

        tokio::time::sleep(self.processing_delay).await;

        let result = self.query_name(span.context(), id).await;
        match &result {
            Ok(_) => span.succeed(),
            Err(e) => span.fail(e),
        }
        result
    }

    /// Run the single lookup statement inside a query span.
    ///
    /// The elapsed time is recorded whether or not a row was found.
    async fn query_name(&self, parent: &Context, id: &str) -> Result<String, StoreError> {
        let mut span = ScopedSpan::start(&self.tracer, parent, QUERY_SPAN);
        span.set_attribute(KeyValue::new("db.system", "sqlite"));
        span.set_attribute(KeyValue::new("db.statement", SELECT_NAME_BY_ID));

        let started = Instant::now();
        let result = self.store.fetch_name(id).await;
        self.instruments.record_query(QUERY_KIND, started.elapsed());

        match &result {
            Ok(_) => span.succeed(),
            Err(e) => span.fail(e),
        }
        result
    }
}
