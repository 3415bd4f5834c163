use gradient_inference::api::{ChatMessage, ChatOptions, GradientClient, ResponsesOptions};
use gradient_inference::config::Config;
use gradient_inference::error::AppError;
use gradient_inference::filter::{filter_models, filter_pricing};
use gradient_inference::output::{
    format_model_table, format_pricing_table, output_completion_json, output_models_json,
    output_pricing_json,
};
use gradient_inference::pricing::{PricingSource, PricingStore};

use crate::cli::{Cli, Commands};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) config: &'a Config,
    pub(crate) use_color: bool,
}

impl CommandContext<'_> {
    fn client(&self) -> GradientClient {
        GradientClient::from_config(self.config, self.cli.api_key.as_deref())
    }
}

fn handle_models(
    ctx: &CommandContext<'_>,
    filter: Option<&str>,
    json: bool,
) -> Result<(), AppError> {
    let mut models = ctx.client().list_models()?;
    if let Some(query) = filter {
        models = filter_models(&models, query);
    }

    if json {
        println!("{}", output_models_json(&models)?);
    } else {
        println!("{}", format_model_table(&models, ctx.use_color));
    }
    Ok(())
}

pub(crate) struct ChatArgs<'a> {
    pub(crate) message: &'a str,
    pub(crate) system: Option<&'a str>,
    pub(crate) model: Option<&'a str>,
    pub(crate) temperature: Option<f64>,
    pub(crate) max_tokens: Option<u32>,
    pub(crate) responses: bool,
    pub(crate) store: bool,
    pub(crate) json: bool,
}

fn handle_chat(ctx: &CommandContext<'_>, args: ChatArgs<'_>) -> Result<(), AppError> {
    if let Some(value) = args.temperature
        && !(0.0..=2.0).contains(&value)
    {
        return Err(AppError::InvalidTemperature { value });
    }

    let client = ctx.client();
    let model = args.model.map(String::from);

    let completion = if args.responses || args.store {
        if args.system.is_some() {
            tracing::warn!("--system is ignored by the responses API");
        }
        client.responses_api(
            args.message,
            &ResponsesOptions {
                model: model.clone(),
                store: args.store,
            },
        )?
    } else {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = args.system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(args.message));
        client.chat_completion(
            &messages,
            &ChatOptions {
                model: model.clone(),
                temperature: args.temperature,
                max_tokens: args.max_tokens,
            },
        )?
    };

    if args.json {
        let model = model.as_deref().unwrap_or(client.default_model());
        println!("{}", output_completion_json(&completion, Some(model))?);
        return Ok(());
    }

    println!("{}", completion.content);
    if let Some(usage) = &completion.usage
        && let Some(total) = usage.total_tokens
    {
        eprintln!("\n  {total} tokens via {}", completion.api);
    }
    Ok(())
}

fn handle_pricing(
    ctx: &CommandContext<'_>,
    filter: Option<&str>,
    no_cache: bool,
    offline: bool,
    json: bool,
) -> Result<(), AppError> {
    let store = PricingStore::from_config(ctx.config);
    let mut report = if offline {
        store.get_pricing_offline()?
    } else {
        store.get_pricing(!no_cache)?
    };
    if let Some(query) = filter {
        report.models = filter_pricing(&report.models, query);
    }

    if json {
        println!("{}", output_pricing_json(&report)?);
        return Ok(());
    }

    if let Some(message) = &report.message {
        eprintln!("{message}");
    }
    println!("{}", format_pricing_table(&report.models, ctx.use_color));

    let fetched = report
        .fetched_at
        .map(|t| format!(", fetched {}", t.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();
    let source = match report.source {
        PricingSource::Live => "live",
        PricingSource::Cache => "cache",
        PricingSource::Fallback => "fallback snapshot",
    };
    println!("  Source: {source}{fetched}\n");
    Ok(())
}

pub(crate) fn run(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    match &ctx.cli.command {
        Commands::Models { filter, json } => handle_models(ctx, filter.as_deref(), *json),
        Commands::Chat {
            message,
            system,
            model,
            temperature,
            max_tokens,
            responses,
            store,
            json,
        } => handle_chat(
            ctx,
            ChatArgs {
                message: message.as_str(),
                system: system.as_deref(),
                model: model.as_deref(),
                temperature: *temperature,
                max_tokens: *max_tokens,
                responses: *responses,
                store: *store,
                json: *json,
            },
        ),
        Commands::Pricing {
            filter,
            no_cache,
            offline,
            json,
        } => handle_pricing(ctx, filter.as_deref(), *no_cache, *offline, *json),
    }
}
