use crate::{
    api::{import, notify},
    mail::MailTransport,
    store::LeaveStore,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-endpoint request budgets keyed by peer IP. Build once and share across workers so
/// every worker draws from the same buckets.
#[derive(Clone)]
pub struct Limiters {
    import: LimiterConfig,
    notify: LimiterConfig,
}

impl Limiters {
    pub fn new(import_per_min: u32, notify_per_min: u32) -> Self {
        Self {
            import: build_limiter(import_per_min),
            notify: build_limiter(notify_per_min),
        }
    }
}

fn build_limiter(requests_per_min: u32) -> LimiterConfig {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are non-zero")
}

pub fn configure<S, M>(cfg: &mut web::ServiceConfig, api_prefix: &str, limiters: &Limiters)
where
    S: LeaveStore + 'static,
    M: MailTransport + 'static,
{
    cfg.service(
        web::scope(api_prefix)
            // /import-excel
            .service(
                web::resource("/import-excel")
                    .wrap(Governor::new(&limiters.import))
                    .route(web::post().to(import::import_excel::<S>)),
            )
            // /send-email
            .service(
                web::resource("/send-email")
                    .wrap(Governor::new(&limiters.notify))
                    .route(web::post().to(notify::send_email::<S, M>)),
            ),
    );
}
