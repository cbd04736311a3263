use crate::cli::OutputFormat;
use anyhow::Result;
#[cfg(feature = "colored-output")]
use colored::*;
use recipes::Recipe;
use std::borrow::Cow;
use std::io::Write;
#[cfg(feature = "table-output")]
use tabled::{Table, Tabled, settings::Style};

pub struct OutputManager {
    #[cfg_attr(not(feature = "colored-output"), allow(dead_code))]
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn format_recipes(&self, recipes: &[Recipe], format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(self.format_pretty(recipes)),
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(recipes)?)),
            OutputFormat::JsonCompact => Ok(format!("{}\n", serde_json::to_string(recipes)?)),
            #[cfg(feature = "table-output")]
            OutputFormat::Table => Ok(self.format_table(recipes)),
            #[cfg(not(feature = "table-output"))]
            OutputFormat::Table => {
                // Fallback to pretty format when table feature is disabled
                Ok(self.format_pretty(recipes))
            }
            OutputFormat::Csv => Ok(Self::format_csv(recipes)),
        }
    }

    fn format_pretty(&self, recipes: &[Recipe]) -> String {
        let mut output = String::new();

        output.push_str(&self.colorize(
            &format!("Recipes ({}):", recipes.len()),
            &Color::Green,
            true,
        ));
        output.push('\n');

        if recipes.is_empty() {
            output.push_str("  No recipes available\n");
            return output;
        }

        for recipe in recipes {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize(&recipe.name, &Color::Cyan, true),
                self.colorize(&format!("({})", recipe.cuisine.text()), &Color::Yellow, false)
            ));

            if let Some(source) = &recipe.source {
                output.push_str(&format!(
                    "    {}: {}\n",
                    self.colorize("Source", &Color::Yellow, false),
                    self.colorize(source.as_str(), &Color::Blue, false)
                ));
            }

            if let Some(youtube) = &recipe.youtube {
                output.push_str(&format!(
                    "    {}: {}\n",
                    self.colorize("Video", &Color::Yellow, false),
                    self.colorize(youtube.as_str(), &Color::Blue, false)
                ));
            }
        }

        output
    }

    #[cfg(feature = "table-output")]
    fn format_table(&self, recipes: &[Recipe]) -> String {
        #[derive(Tabled)]
        struct TableRow<'a> {
            name: &'a str,
            cuisine: String,
            source: &'a str,
            photo: &'a str,
        }

        let rows = recipes.iter().map(|recipe| TableRow {
            name: &recipe.name,
            cuisine: recipe.cuisine.text(),
            source: recipe.source.as_ref().map_or("-", |u| u.as_str()),
            photo: recipe.small_photo.as_ref().map_or("-", |u| u.as_str()),
        });

        let mut table = Table::new(rows).with(Style::modern()).to_string();
        table.push('\n');
        table
    }

    fn format_csv(recipes: &[Recipe]) -> String {
        let mut output = String::new();
        output.push_str("uuid,name,cuisine,source_url,photo_url_small,photo_url_large,youtube_url\n");

        let link = |url: Option<&url::Url>| url.map_or("", |u| u.as_str()).to_string();

        for recipe in recipes {
            output.push_str(&format!(
                "{},\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"\n",
                recipe.id,
                Self::escape_csv(&recipe.name),
                Self::escape_csv(recipe.cuisine.demonym()),
                link(recipe.source.as_ref()),
                link(recipe.small_photo.as_ref()),
                link(recipe.large_photo.as_ref()),
                link(recipe.youtube.as_ref()),
            ));
        }

        output
    }

    // Helper method to avoid unnecessary allocations when escaping CSV
    fn escape_csv(s: &str) -> Cow<'_, str> {
        if s.contains('"') {
            Cow::Owned(s.replace('"', "\"\""))
        } else {
            Cow::Borrowed(s)
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.colorize(text, &Color::Green, true)
    }

    pub fn highlight(&self, text: &str) -> String {
        self.colorize(text, &Color::Cyan, false)
    }

    pub fn warning(&self, text: &str) -> String {
        self.colorize(text, &Color::Yellow, false)
    }

    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Green => text.green(),
                    Color::Yellow => text.yellow(),
                    Color::Blue => text.blue(),
                    Color::Cyan => text.cyan(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (color, bold);
            text.to_string()
        }
    }
}

enum Color {
    Green,
    Yellow,
    Blue,
    Cyan,
}

pub fn write_output(content: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
