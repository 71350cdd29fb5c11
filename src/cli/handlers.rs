use std::io::Read;
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::dom::badge_visual;
use crate::editor::filter_items;
use crate::io::catalog_io::{self, CatalogError};
use crate::model::{Catalog, Config, MentionKind, MentionToken};
use crate::parse::extract_mentions;
use crate::tui;
use crate::tui::render::content::{RenderOptions, RenderedContent, render_comment_content};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: Config) -> CmdResult {
    let json = cli.json;
    let catalog = load_catalog_arg(cli.catalog.as_deref())?;

    match cli.command {
        None => {
            tui::run(&catalog, config, "you".to_string(), "")?;
            Ok(())
        }
        Some(cmd) => match cmd {
            Commands::Compose(args) => cmd_compose(args, &catalog, config, json),
            Commands::Render(args) => cmd_render(args, &catalog, json),
            Commands::Mentions(args) => cmd_mentions(args, json),
            Commands::Items(args) => cmd_items(args, &catalog, json),
            Commands::Avatars => cmd_avatars(&catalog, json),
        },
    }
}

/// No `--catalog` means nothing to mention, not an error
fn load_catalog_arg(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => catalog_io::load_catalog(path),
        None => Ok(Catalog::default()),
    }
}

/// The text argument, or all of stdin for "-"
fn read_text(arg: String) -> Result<String, std::io::Error> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(arg)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_compose(args: ComposeArgs, catalog: &Catalog, config: Config, json: bool) -> CmdResult {
    let comments = tui::run(catalog, config, args.author, &args.text)?;
    if json {
        let out: Vec<CommentJson> = comments
            .into_iter()
            .map(|c| CommentJson {
                mentions: extract_mentions(&c.content)
                    .into_iter()
                    .map(MentionJson::from)
                    .collect(),
                author: c.author,
                content: c.content,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for comment in comments {
            println!("{}", comment.content);
        }
    }
    Ok(())
}

fn cmd_render(args: TextArgs, catalog: &Catalog, json: bool) -> CmdResult {
    let text = read_text(args.text)?;
    let avatars = catalog.avatar_lookup();
    let options = RenderOptions {
        avatars: Some(&avatars),
        theme: None,
    };
    let rendered = render_comment_content(&text, None, Some(options));

    let lines: Vec<String> = match &rendered {
        RenderedContent::Plain(s) => s.split('\n').map(str::to_string).collect(),
        RenderedContent::Rich(rich) => rich
            .lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect(),
    };

    if json {
        let badges = match &rendered {
            RenderedContent::Plain(_) => Vec::new(),
            RenderedContent::Rich(rich) => rich
                .hits
                .iter()
                .map(|hit| BadgeJson {
                    visual: VisualJson::from(&badge_visual(&hit.token, Some(&avatars))),
                    token: hit.token.clone(),
                    row: hit.row,
                    col_start: hit.col_start,
                    col_end: hit.col_end,
                })
                .collect(),
        };
        let out = RenderJson {
            plain: rendered.as_plain().is_some(),
            lines,
            badges,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_mentions(args: TextArgs, json: bool) -> CmdResult {
    let text = read_text(args.text)?;
    let mentions: Vec<MentionToken> = extract_mentions(&text);
    if json {
        let out: Vec<MentionJson> = mentions.into_iter().map(MentionJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for token in mentions {
            println!("{}\t{}", token.kind, token.label);
        }
    }
    Ok(())
}

fn cmd_items(args: ItemsArgs, catalog: &Catalog, json: bool) -> CmdResult {
    let kind = args
        .kind
        .as_deref()
        .map(|k| MentionKind::parse(k).ok_or_else(|| format!("unknown kind: {} (expected task, file or user)", k)))
        .transpose()?;

    let items = catalog.mention_items();
    let query = args.query.as_deref().unwrap_or("");
    let selected: Vec<_> = filter_items(&items, query)
        .into_iter()
        .filter_map(|i| items.get(i))
        .filter(|item| kind.is_none_or(|k| item.kind == k))
        .collect();

    if json {
        let out = ItemsJson {
            query: args.query.as_deref(),
            items: selected,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if selected.is_empty() {
        println!("(no matches)");
    } else {
        for item in selected {
            println!("{}", format_item_line(item));
        }
    }
    Ok(())
}

fn cmd_avatars(catalog: &Catalog, json: bool) -> CmdResult {
    let lookup = catalog.avatar_lookup();
    let entries = lookup.entries();
    if json {
        let out: Vec<AvatarJson> = entries
            .into_iter()
            .map(|(label, avatar_url)| AvatarJson { label, avatar_url })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if entries.is_empty() {
        println!("(no avatars)");
    } else {
        for (label, url) in entries {
            println!("{}\t{}", label, url);
        }
    }
    Ok(())
}
