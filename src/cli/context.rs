use std::sync::{Arc, Mutex};

use crate::api::ApiClient;
use crate::cli::config::{load_server_config, resolve_base_url};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::guard::{GuardRunner, GuardSettings, TokioClock};
use crate::menu::MenuService;
use crate::navigation::{Navigation, Navigator, Notice, Notifier};
use crate::session::{FileTokenStore, SessionRoutes, SessionStore};

/// Prints navigations instead of routing; remembers them for JSON output
pub struct ConsoleNavigator {
    output_format: OutputFormat,
    history: Mutex<Vec<Navigation>>,
}

impl ConsoleNavigator {
    pub fn new(output_format: OutputFormat) -> Self {
        Self {
            output_format,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn history(&self) -> Vec<Navigation> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, target: Navigation) {
        if let OutputFormat::Text = self.output_format {
            let kind = if target.is_full() { "reload" } else { "route" };
            eprintln!("→ {} {}", kind, target.path());
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(target);
        }
    }
}

pub struct ConsoleNotifier {
    output_format: OutputFormat,
    notices: Mutex<Vec<Notice>>,
}

impl ConsoleNotifier {
    pub fn new(output_format: OutputFormat) -> Self {
        Self {
            output_format,
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        if let OutputFormat::Text = self.output_format {
            eprintln!("! {}", notice);
        }
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

/// Everything a command needs, wired the way the dashboard shell wires it
pub struct AdminContext {
    pub config: AppConfig,
    pub tokens: Arc<FileTokenStore>,
    pub client: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<ConsoleNavigator>,
    pub notifier: Arc<ConsoleNotifier>,
}

impl AdminContext {
    pub fn build(output_format: &OutputFormat) -> anyhow::Result<Self> {
        let mut config = crate::config::config().clone();
        config.api.base_url = resolve_base_url(&config, &load_server_config()?);

        let tokens = Arc::new(FileTokenStore::from_config(&config.session)?);
        let client = Arc::new(ApiClient::from_config(&config, tokens.clone())?);
        let navigator = Arc::new(ConsoleNavigator::new(output_format.clone()));
        let notifier = Arc::new(ConsoleNotifier::new(output_format.clone()));

        let session = Arc::new(SessionStore::new(
            client.clone(),
            tokens.clone(),
            navigator.clone(),
            SessionRoutes::from(&config.session),
        ));
        session.register_unauthorized_handler(&client);

        tracing::debug!(base_url = %client.base_url(), token_file = %tokens.path().display(), "cli context ready");

        Ok(Self {
            config,
            tokens,
            client,
            session,
            navigator,
            notifier,
        })
    }

    pub fn menu_service(&self) -> MenuService {
        MenuService::new(self.client.clone()).with_fallback(self.config.menu.fallback_enabled)
    }

    pub fn guard_settings(&self) -> GuardSettings {
        GuardSettings::from_config(&self.config)
    }

    pub fn guard_runner(&self) -> GuardRunner {
        GuardRunner::new(self.notifier.clone(), self.navigator.clone(), Arc::new(TokioClock))
    }
}
