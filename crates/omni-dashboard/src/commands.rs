use eyre::Result;

use omni_bedrock::context::welcome_message;
use omni_bridge::launch::smart_link;
use omni_bridge::link::{AppLinkConfig, build_deep_link};
use omni_bridge::platform::Platform;
use omni_core::dataset::Dataset;
use omni_core::filter::{FilterType, resolve_question};
use omni_dashboard::config::{ConfigUpdate, OmniConfig, config_path, load_config, save_config};
use omni_dashboard::state::{
    DashboardState, MetricFilter, QuestionCardState, ScoreCardState,
};
use omni_dashboard::views::Views;
use omni_storage::store::FileStore;
use omni_storage::transcript::TranscriptStore;

pub struct ShowOptions {
    pub filter: FilterType,
    pub menu: bool,
    pub expand: bool,
    pub explain: bool,
    pub metrics: MetricFilter,
    pub discrepancy: Option<String>,
}

pub fn show(options: ShowOptions) -> Result<()> {
    let dataset = Dataset::fixture();
    let views = Views::new()?;

    let mut state = DashboardState::new();
    state.select_filter(options.filter);
    if options.menu {
        state.toggle_filter_menu();
    }
    if let Some(id) = &options.discrepancy
        && !state.click_discrepancy(&dataset.questions, id)
    {
        eyre::bail!("no question for discrepant response `{id}`");
    }

    let score_state = ScoreCardState {
        expanded: options.expand,
        show_explanation: options.explain,
        metric_filter: options.metrics,
    };

    print!("{}", views.dashboard(dataset, &state, &score_state)?);
    Ok(())
}

pub fn question(id: &str, expand: bool, peek: bool) -> Result<()> {
    let dataset = Dataset::fixture();
    let question = resolve_question(&dataset.questions, id)?;

    let mut card = QuestionCardState::default();
    if peek {
        card.toggle_parent_peek();
    }
    if expand {
        card.toggle_expanded();
    }

    print!("{}", Views::new()?.question_card(question, &card)?);
    Ok(())
}

pub fn discrepancy(id: &str) -> Result<()> {
    let dataset = Dataset::fixture();
    let question = resolve_question(&dataset.questions, id)?;
    print!("{}", Views::new()?.discrepancy_popup(question)?);
    Ok(())
}

/// Print the config, or apply `update` and save it.
pub fn config(update: ConfigUpdate) -> Result<()> {
    let mut config = load_config()?;
    if !update.is_empty() {
        update.apply(&mut config)?;
        save_config(&config)?;
    }

    println!("config: {}", config_path()?.display());
    println!("region: {}", config.region);
    println!("model_id: {}", config.model_id);
    println!("temperature: {}", config.temperature);
    println!("data_dir: {}", config.data_dir()?.display());
    Ok(())
}

pub fn transcript_store(config: &OmniConfig) -> Result<TranscriptStore<FileStore>> {
    Ok(TranscriptStore::new(FileStore::new(config.data_dir()?)))
}

pub fn history_show() -> Result<()> {
    let config = load_config()?.with_env_overrides();
    let dataset = Dataset::fixture();
    let views = Views::new()?;

    let store = transcript_store(&config)?;
    let messages = store.load(&welcome_message(&dataset.profile));
    for message in &messages {
        println!("{}", views.chat_message(message, &dataset.profile.name)?);
    }
    Ok(())
}

pub fn history_clear() -> Result<()> {
    let config = load_config()?.with_env_overrides();
    transcript_store(&config)?.clear()?;
    println!("Chat history cleared.");
    Ok(())
}

pub fn link(
    config: &AppLinkConfig,
    user_agent: Option<&str>,
    touch_points: u32,
    web_fallback: Option<&str>,
) {
    println!("{}", build_deep_link(config));

    if let Some(ua) = user_agent {
        let platform = Platform::from_user_agent(ua, touch_points);
        println!(
            "ios={} safari={} link={}",
            platform.is_ios(),
            platform.is_safari(),
            smart_link(&platform, config, web_fallback)
        );
    }
}
