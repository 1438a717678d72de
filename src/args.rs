//! Argument assembly for `kustomize build`

use std::borrow::Cow;

/// Subcommand passed to the kustomize binary
pub const BUILD_SUBCOMMAND: &str = "build";

/// Flatten build arguments and an optional kustomization path into an
/// argument vector.
///
/// Each build argument may carry several whitespace-separated tokens
/// (`"--foo bar"`); they are split and appended in order. The kustomization
/// path is appended last as a single token and is never split. Whitespace-only
/// arguments contribute nothing.
///
/// Returns an empty vector when there is nothing to pass.
pub fn build_args<S: AsRef<str>>(build_args: &[S], kustomize_path: &str) -> Vec<String> {
    let mut args: Vec<String> = build_args
        .iter()
        .flat_map(|arg| arg.as_ref().split_whitespace())
        .map(str::to_string)
        .collect();

    if !kustomize_path.is_empty() {
        args.push(kustomize_path.to_string());
    }

    args
}

/// Full argument list for the kustomize binary: `build` followed by
/// [`build_args`].
pub fn build_command_line<S: AsRef<str>>(build_args: &[S], kustomize_path: &str) -> Vec<String> {
    let mut args = vec![BUILD_SUBCOMMAND.to_string()];
    args.extend(self::build_args(build_args, kustomize_path));
    args
}

/// Quote `token` for a POSIX shell. Tokens made only of safe characters are
/// returned unchanged; anything else is single-quoted.
pub fn shell_quote(token: &str) -> Cow<'_, str> {
    let safe = |c: char| c.is_ascii_alphanumeric() || "-_./=:,@%+".contains(c);
    if !token.is_empty() && token.chars().all(safe) {
        return Cow::Borrowed(token);
    }
    Cow::Owned(format!("'{}'", token.replace('\'', r"'\''")))
}

/// Render an argument vector as one line that a shell splits back into the
/// same tokens.
pub fn shell_join<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|token| shell_quote(token.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
