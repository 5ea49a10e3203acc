/// Emit build and git information as `VERGEN_*` environment variables.
///
/// Outside of a git checkout the git values fall back to placeholders instead of failing the build.
pub fn generate() -> anyhow::Result<()> {
    vergen::EmitBuilder::builder()
        .all_build()
        .all_git()
        .git_describe(true, true, None)
        .fail_on_error()
        .emit()
        .or_else(|_| vergen::EmitBuilder::builder().all_build().emit())
}
