mod cli;
mod errors;
mod logging;
mod render;
mod script;

use std::fs;
use std::path::Path;

use clap::Parser;
use cli::{Cli, Cmd};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use form::config::{CountryList, LocaleTexts};
use form::contact::ContactForm;
use form::ValueTree;
use tracing::{debug, info};

const DEFAULT_TEXTS: &str = include_str!("../assets/texts.ron");
const DEFAULT_COUNTRIES: &str = include_str!("../assets/countries.ron");

fn main() -> Result<()> {
    let cli = Cli::parse();
    errors::init()?;
    logging::init(&cli.log_level)?;

    let locales = load_locales(cli.texts.as_deref())?;
    let texts = locales
        .resolve(cli.locale.as_deref())
        .ok_or_else(|| eyre!("no texts for locale `{}`", locales.default_locale))?
        .clone();
    let countries = load_countries(cli.countries.as_deref())?;
    debug!(
        locales = ?locales.locale_names().collect::<Vec<_>>(),
        countries = countries.names().len(),
        "configuration loaded"
    );

    let mut form = ContactForm::new(&texts, countries.names(), print_submission);

    match cli.cmd {
        Cmd::Show => print!("{}", render::render(&form, &texts.send_button)),
        Cmd::Submit { values } => {
            let raw = fs::read_to_string(&values)
                .wrap_err_with(|| format!("reading {}", values.display()))?;
            let json: serde_json::Value = serde_json::from_str(&raw)
                .wrap_err_with(|| format!("parsing {}", values.display()))?;
            let tree = ValueTree::from_json(json)
                .wrap_err_with(|| format!("{} is not a value tree", values.display()))?;
            form.load(&tree)?;
            let outcome = form.submit();
            info!(submitted = outcome.is_submitted(), "done");
            print!("{}", render::render(&form, &texts.send_button));
        }
        Cmd::Script { script: path } => {
            let raw = fs::read_to_string(&path)
                .wrap_err_with(|| format!("reading {}", path.display()))?;
            let actions = script::parse(&raw)?;
            info!(actions = actions.len(), "running script");
            print!("{}", script::run(&mut form, &actions, &texts.send_button)?);
        }
    }
    Ok(())
}

/// Submit sink: the accepted value tree goes to stdout as JSON.
fn print_submission(values: &ValueTree) {
    match serde_json::to_string_pretty(&values.to_json()) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::error!(%err, "cannot serialize submitted values"),
    }
}

fn load_locales(path: Option<&Path>) -> Result<LocaleTexts> {
    let raw = match path {
        Some(path) => {
            fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?
        }
        None => DEFAULT_TEXTS.to_string(),
    };
    LocaleTexts::from_ron_str(&raw).wrap_err("loading texts")
}

fn load_countries(path: Option<&Path>) -> Result<CountryList> {
    let raw = match path {
        Some(path) => {
            fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?
        }
        None => DEFAULT_COUNTRIES.to_string(),
    };
    CountryList::from_ron_str(&raw).wrap_err("loading countries")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_configuration_loads() {
        let locales = load_locales(None).unwrap();
        assert_eq!(locales.default_locale, "es");
        assert!(locales.resolve(Some("en")).is_some());
        assert!(!load_countries(None).unwrap().names().is_empty());
    }

    #[test]
    fn built_in_countries_cover_every_country() {
        let countries = load_countries(None).unwrap();
        assert_eq!(countries.names().len(), 250);
        for name in ["Kenya", "Spain", "Argentina", "Vietnam", "New Zealand"] {
            assert!(countries.names().iter().any(|c| c == name), "{name} missing");
        }
    }

    #[test]
    fn every_locale_has_the_same_category_options_count() {
        let locales = load_locales(None).unwrap();
        let counts: Vec<usize> = locales
            .locales
            .values()
            .map(|t| t.fields.categories_options.len())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] == w[1]));
    }
}
