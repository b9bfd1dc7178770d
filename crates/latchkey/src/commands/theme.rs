//! Light/dark theme selection.

use crate::cli::{ThemeArgs, ThemeCommand};
use crate::error::CliError;
use crate::output;

use super::Ctx;

pub fn handle(ctx: &mut Ctx, args: ThemeArgs) -> Result<(), CliError> {
    match args.command.unwrap_or(ThemeCommand::Show) {
        ThemeCommand::Show => {
            let theme = ctx.theme.theme();
            let out = output::render_single(
                ctx.output,
                &theme,
                ToString::to_string,
                ToString::to_string,
            )?;
            ctx.print(&out);
            Ok(())
        }
        ThemeCommand::Toggle => {
            let theme = ctx.theme.toggle()?;
            ctx.repaint();
            ctx.success(format!("Switched to the {theme} theme"));
            Ok(())
        }
        ThemeCommand::Set { theme } => {
            ctx.theme.set(theme.into())?;
            ctx.repaint();
            ctx.success(format!("Using the {} theme", ctx.theme.theme()));
            Ok(())
        }
    }
}
