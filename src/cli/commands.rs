//! Command dispatch: one function per subcommand

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, EditSession};
use crate::cli::args::{
    Anchor, AttachCommands, Cli, Commands, CommentCommands, ConfigCommands, Target,
};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{parse_people, NodeEdit, NodeId, NodeTree, Position};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::{node_label, TreeNodeConvert};
use crate::util::path::PathExt;

/// Everything a document command needs: wired services and the resolved document path.
struct Context {
    container: ServiceContainer,
    path: PathBuf,
}

impl Context {
    fn open_session(&self) -> CliResult<EditSession> {
        let mut session =
            EditSession::with_hit_tester(NodeTree::empty(), self.container.hit_tester());
        session.load(&self.container.documents, &self.path)?;
        Ok(session)
    }

    fn save(&self, session: &EditSession) -> CliResult<()> {
        session.save(&self.container.documents, &self.path)?;
        Ok(())
    }
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => return _completion(*shell),
        Commands::Config { command } => return _config(cli.config.as_deref(), command),
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let path = document_path(cli.file.as_deref(), &settings)?;
    let ctx = Context {
        container: ServiceContainer::new(settings),
        path,
    };

    match command {
        Commands::Init { force } => _init(&ctx, *force),
        Commands::Show => _show(&ctx),
        Commands::Info { target } => _info(&ctx, target),
        Commands::Add { anchor, title } => _add(&ctx, anchor, title, false),
        Commands::Twin { anchor, title } => _add(&ctx, anchor, title, true),
        Commands::Move { target, dx, dy } => _move(&ctx, target, *dx, *dy),
        Commands::Place { target, to } => _place(&ctx, target, *to),
        Commands::Edit {
            target,
            title,
            text,
            people,
            progress,
            priority,
            clear_text,
        } => {
            let edit = NodeEdit {
                title: title.clone(),
                text: if *clear_text {
                    Some(String::new())
                } else {
                    text.clone()
                },
                people: people.as_deref().map(parse_people),
                progress: *progress,
                priority: *priority,
            };
            _edit(&ctx, target, edit)
        }
        Commands::Delete { target, yes } => _delete(&ctx, target, *yes),
        Commands::Comment { command } => _comment(&ctx, command),
        Commands::Attach { command } => _attach(&ctx, command),
        Commands::Find { fragment } => _find(&ctx, fragment),
        Commands::Hit { point } => _hit(&ctx, *point),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

/// `--file` wins over the configured default document.
fn document_path(file: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| settings.default_document.clone())
        .ok_or_else(|| {
            CliError::Usage(
                "no document given: pass --file or set default_document in the config".into(),
            )
        })
}

/// Select the node a command acts on and return its id.
fn select_target(session: &mut EditSession, target: &Target) -> CliResult<NodeId> {
    if let Some(point) = target.at {
        return session
            .select_at(point)
            .ok_or_else(|| ApplicationError::NoMatch(format!("point {point}")).into());
    }
    match &target.node {
        Some(fragment) => session
            .search(fragment)
            .ok_or_else(|| ApplicationError::NoMatch(format!("\"{fragment}\"")).into()),
        None => Err(CliError::InvalidArgs("give --node or --at".into())),
    }
}

fn select_anchor(session: &mut EditSession, anchor: &Anchor) -> CliResult<Option<NodeId>> {
    if anchor.under.is_none() && anchor.at.is_none() {
        return Ok(None);
    }
    let target = Target {
        node: anchor.under.clone(),
        at: anchor.at,
    };
    select_target(session, &target).map(Some)
}

fn title_of(session: &EditSession, node: NodeId) -> String {
    session
        .tree()
        .data(node)
        .map(|data| data.title.to_string())
        .unwrap_or_default()
}

#[instrument(skip(ctx))]
fn _init(ctx: &Context, force: bool) -> CliResult<()> {
    if !ctx.path.is_json_document() {
        output::warning(&format!(
            "{} has no .json extension",
            ctx.path.display()
        ));
    }
    ctx.container.documents.create(&ctx.path, force)?;
    output::success(&format!("created {}", ctx.path.display()));
    Ok(())
}

#[instrument(skip(ctx))]
fn _show(ctx: &Context) -> CliResult<()> {
    let session = ctx.open_session()?;
    let tree = session.tree();
    if tree.is_empty() {
        output::warning(&format!("{} holds no nodes", ctx.path.display()));
        return Ok(());
    }
    output::info(&tree.to_tree_string(&ctx.path.display().to_string()));
    Ok(())
}

#[instrument(skip(ctx))]
fn _info(ctx: &Context, target: &Target) -> CliResult<()> {
    let mut session = ctx.open_session()?;
    let node = select_target(&mut session, target)?;
    let tree = session.tree();
    let data = tree.data(node).ok_or(ApplicationError::NoSelection)?;

    output::header(&data.title);
    output::action("position", &data.position);
    output::action(
        "priority",
        &format!("{} {}", data.priority.label(), data.priority.tag()),
    );
    output::action("progress", &data.progress);
    let parent = tree
        .parent(node)
        .map(|p| title_of(&session, p))
        .unwrap_or_else(|| "-".to_string());
    output::action("parent", &parent);
    output::action("children", &tree.children(node).len());
    output::action("people", &data.people.join(", "));
    output::action("text", &data.text);

    output::action("comments", &data.comments.len());
    for (i, comment) in data.comments.iter().enumerate() {
        output::detail(&format!("[{i}] {comment}"));
    }
    output::action("files", &data.files.len());
    for (i, file) in data.files.iter().enumerate() {
        output::detail(&format!("[{i}] {file}"));
    }
    Ok(())
}

#[instrument(skip(ctx))]
fn _add(ctx: &Context, anchor: &Anchor, title: &str, twin: bool) -> CliResult<()> {
    let mut session = ctx.open_session()?;
    let added = match select_anchor(&mut session, anchor)? {
        Some(_) if twin => session.add_twin_branch(title),
        Some(_) => session.add_node(title),
        // No anchor: a new top-level entry
        None if twin => session.tree_mut().add_twin_branch(None, title),
        None => session.tree_mut().add_node(None, title),
    };

    let Some(node) = added else {
        output::warning("empty title, nothing added");
        return Ok(());
    };
    ctx.save(&session)?;
    let position = session
        .tree()
        .data(node)
        .map(|data| data.position)
        .unwrap_or_default();
    output::success(&format!("added \"{}\" at {}", title.trim(), position));
    Ok(())
}

#[instrument(skip(ctx))]
fn _move(ctx: &Context, target: &Target, dx: f64, dy: f64) -> CliResult<()> {
    let mut session = ctx.open_session()?;
    let node = select_target(&mut session, target)?;
    let position = session.move_selected(dx, dy)?;
    ctx.save(&session)?;
    output::success(&format!("moved \"{}\" to {}", title_of(&session, node), position));
    Ok(())
}

#[instrument(skip(ctx))]
fn _place(ctx: &Context, target: &Target, to: Position) -> CliResult<()> {
    let mut session = ctx.open_session()?;
    let node = select_target(&mut session, target)?;
    let position = session.tree_mut().place_node(node, to)?;
    ctx.save(&session)?;
    output::success(&format!("placed \"{}\" at {}", title_of(&session, node), position));
    Ok(())
}

#[instrument(skip(ctx))]
fn _edit(ctx: &Context, target: &Target, edit: NodeEdit) -> CliResult<()> {
    if edit.is_empty() {
        return Err(CliError::InvalidArgs(
            "nothing to edit: give --title, --text, --people, --progress, --priority or --clear-text"
                .into(),
        ));
    }
    let mut session = ctx.open_session()?;
    let node = select_target(&mut session, target)?;
    session.edit_selected(edit)?;
    ctx.save(&session)?;
    output::success(&format!("updated \"{}\"", title_of(&session, node)));
    Ok(())
}

#[instrument(skip(ctx))]
fn _delete(ctx: &Context, target: &Target, yes: bool) -> CliResult<()> {
    let mut session = ctx.open_session()?;
    let node = select_target(&mut session, target)?;
    let title = title_of(&session, node);
    let orphans = session.tree().children(node).len();

    let confirmed = yes || confirm(&format!("Delete \"{title}\"? [y/N]"))?;
    let Some(_) = session.delete_selected(confirmed) else {
        output::warning("aborted, nothing deleted");
        return Ok(());
    };
    ctx.save(&session)?;
    output::success(&format!("deleted \"{title}\""));
    if orphans > 0 {
        output::detail(&format!("{orphans} child node(s) are now top-level"));
    }
    Ok(())
}

fn confirm(question: &str) -> CliResult<bool> {
    output::prompt(question);
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| InfraError::io("read confirmation", e))?;
    let answer = answer.trim().to_lowercase();
    debug!("confirm: answer={:?}", answer);
    Ok(answer == "y" || answer == "yes")
}

#[instrument(skip(ctx))]
fn _comment(ctx: &Context, command: &CommentCommands) -> CliResult<()> {
    let mut session = ctx.open_session()?;
    let message = match command {
        CommentCommands::Add { target, text } => {
            let node = select_target(&mut session, target)?;
            let index = session.tree_mut().add_comment(node, text)?;
            format!("added comment [{index}] to \"{}\"", title_of(&session, node))
        }
        CommentCommands::Edit {
            target,
            index,
            text,
        } => {
            let node = select_target(&mut session, target)?;
            session.tree_mut().edit_comment(node, *index, text)?;
            format!("replaced comment [{index}] of \"{}\"", title_of(&session, node))
        }
        CommentCommands::Rm { target, index } => {
            let node = select_target(&mut session, target)?;
            let removed = session.tree_mut().remove_comment(node, *index)?;
            format!("removed comment \"{removed}\"")
        }
    };
    ctx.save(&session)?;
    output::success(&message);
    Ok(())
}

#[instrument(skip(ctx))]
fn _attach(ctx: &Context, command: &AttachCommands) -> CliResult<()> {
    let mut session = ctx.open_session()?;
    let message = match command {
        AttachCommands::Add { target, path } => {
            let node = select_target(&mut session, target)?;
            warn_if_missing(ctx, path);
            let index = session
                .tree_mut()
                .attach_file(node, &path.to_string_lossy())?;
            format!("attached [{index}] {} to \"{}\"", path.display(), title_of(&session, node))
        }
        AttachCommands::Replace {
            target,
            index,
            path,
        } => {
            let node = select_target(&mut session, target)?;
            warn_if_missing(ctx, path);
            let old = session
                .tree_mut()
                .replace_file(node, *index, &path.to_string_lossy())?;
            format!("replaced {old} with {}", path.display())
        }
        AttachCommands::Rm { target, index } => {
            let node = select_target(&mut session, target)?;
            let removed = session.tree_mut().detach_file(node, *index)?;
            format!("detached {removed}")
        }
        AttachCommands::Open { target, index } => {
            let node = select_target(&mut session, target)?;
            let opened = ctx
                .container
                .documents
                .open_attachment(session.tree(), node, *index)?;
            // Opening changes nothing in the document
            output::success(&format!("opened {}", opened.display()));
            return Ok(());
        }
    };
    ctx.save(&session)?;
    output::success(&message);
    Ok(())
}

fn warn_if_missing(ctx: &Context, path: &Path) {
    if !ctx.container.fs.is_file(path) {
        output::warning(&format!("{} does not exist (yet)", path.display()));
    }
}

#[instrument(skip(ctx))]
fn _find(ctx: &Context, fragment: &str) -> CliResult<()> {
    let mut session = ctx.open_session()?;
    let node = session
        .search(fragment)
        .ok_or_else(|| ApplicationError::NoMatch(format!("\"{fragment}\"")))?;
    print_node(&session, node);
    Ok(())
}

#[instrument(skip(ctx))]
fn _hit(ctx: &Context, point: Position) -> CliResult<()> {
    let mut session = ctx.open_session()?;
    let node = session
        .select_at(point)
        .ok_or_else(|| ApplicationError::NoMatch(format!("point {point}")))?;
    print_node(&session, node);
    Ok(())
}

fn print_node(session: &EditSession, node: NodeId) {
    if let Some(data) = session.tree().data(node) {
        output::info(&node_label(data));
    }
}

#[instrument]
fn _config(explicit: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(explicit)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &describe(&path)),
                None => output::action("global", &"no config directory on this platform"),
            }
            if let Some(path) = explicit {
                output::action("explicit", &describe(path));
            }
        }
    }
    Ok(())
}

fn describe(path: &Path) -> String {
    let state = if path.is_file() { "exists" } else { "not found" };
    format!("{} ({state})", path.display())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
