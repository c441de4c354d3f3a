use crate::{
    ConvertArgs,
    convert::{BuildError, BuildResult, Builder, FileWatcher, WatchEvent, WatchPaths, default_output_path},
};

pub async fn run(args: &ConvertArgs) -> Result<(), anyhow::Error> {
    let input = args.input.clone();
    if !input.is_file() {
        return Err(BuildError::InputNotFound(input).into());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&input));

    println!(
        "Converting '{}' to '{}'...",
        input.display(),
        output.display()
    );

    let builder = Builder::new(input, output, args.config_file.clone());
    let result = builder.build()?;
    println!("Conversion successful!");

    if args.watch {
        tokio::task::spawn_blocking(move || watch(builder, result)).await??;
    }

    Ok(())
}

/// Reconvert whenever one of the files the page was built from changes.
///
/// Conversion errors are reported and the previous set of files stays
/// watched, so fixing the broken file triggers the next attempt.
fn watch(builder: Builder, mut result: BuildResult) -> Result<(), anyhow::Error> {
    loop {
        let paths = WatchPaths::new(result.dependencies.iter().cloned());
        let watcher = FileWatcher::new(&result.config.config.watch, &paths)?;
        println!("Watching {} file(s) for changes...", paths.file_count());

        match watcher.recv() {
            Some(WatchEvent::FilesChanged(changed)) => {
                for path in &changed {
                    tracing::info!(path = %path.display(), "file changed");
                }
                println!(
                    "\nDetected {} change(s), converting '{}'...",
                    changed.len(),
                    builder.input().display()
                );

                match builder.build() {
                    Ok(new_result) => {
                        println!(
                            "Conversion successful! Wrote '{}'",
                            new_result.output_path.display()
                        );
                        result = new_result;
                    }
                    Err(e) => eprintln!("Conversion error: {}", e),
                }
            }
            Some(WatchEvent::Error(e)) => eprintln!("Watch error: {}", e),
            None => return Ok(()),
        }
    }
}
