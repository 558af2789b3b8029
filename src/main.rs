use astra::Server;
use summer_programs::config::Config;
use summer_programs::db::{init_db, Database};
use summer_programs::repository::{build_repository, FixtureProgramRepository};
use summer_programs::router::{respond, AppState};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let db = Database::new(&config.database_path);
    if let Err(e) = init_db(&db, &config.schema_path) {
        log::error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    if config.seed_from_fixture {
        let fixture = FixtureProgramRepository::new(&config.fixture_path);
        match fixture.seed_sqlite(&db) {
            Ok(0) => {}
            Ok(n) => log::info!("seeded {n} programs from {}", config.fixture_path.display()),
            Err(e) => log::warn!("fixture seeding skipped: {e}"),
        }
    }

    let repo = match build_repository(&config, db.clone()) {
        Ok(repo) => repo,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr;
    let server = Server::bind(&addr).max_workers(config.max_workers);
    let state = AppState::new(config, db, repo);

    log::info!("Starting server at http://{addr}");
    if let Err(e) = server.serve(move |req, _info| respond(req, &state)) {
        log::error!("Server ended with error: {e}");
    }

    log::info!("Server shut down cleanly.");
}
