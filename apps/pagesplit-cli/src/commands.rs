use crate::cli::{ReorderArgs, SplitArgs};
use anyhow::{bail, Context, Result};
use pagesplit_core::{
    base_name_of, collect_previews, merge_documents, parse_selection_in_order, rebuild_document,
    reorder_document, run_split, BlankPageRenderer, CancelToken, DirectorySink, OutputDocument,
    PageEntryId, PageInfo, PagePreview, PageSplitError, ReorderSession, SourceDocument, SplitJob,
    SplitOptions,
};
use std::path::{Path, PathBuf};

pub async fn split(args: SplitArgs) -> Result<()> {
    let options = match &args.options {
        Some(path) => read_options(path).await?,
        None => args.flag_options(),
    };

    let (source, base_name) = load_source(&args.path).await?;
    let job = SplitJob::new(source, base_name, options);
    let groups = job.plan()?;

    if groups.len() == 1 {
        let outputs = tokio::task::spawn_blocking(move || run_split(&job)).await??;
        let output = outputs
            .into_iter()
            .next()
            .context("Split produced no document")?;
        let path = args
            .output
            .unwrap_or_else(|| args.output_dir.join(&output.name));
        write_output(&path, &output.bytes).await?;
        println!("Wrote {} ({} pages)", path.display(), groups[0].indices.len());
        return Ok(());
    }

    if args.output.is_some() {
        tracing::warn!(
            documents = groups.len(),
            "--output ignored, writing into the output directory"
        );
    }

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let output_dir = args.output_dir.clone();
    let count = tokio::task::spawn_blocking(move || -> Result<usize, PageSplitError> {
        let mut sink = DirectorySink::create(&output_dir)?;
        job.execute(&mut sink, &cancel)
    })
    .await??;

    println!(
        "Split {} into {} documents in {}",
        args.path.display(),
        count,
        args.output_dir.display()
    );

    Ok(())
}

pub async fn reorder(args: ReorderArgs) -> Result<()> {
    let (source, base_name) = load_source(&args.path).await?;

    let ReorderArgs {
        path,
        order,
        moves,
        removes,
        output,
    } = args;

    let document = tokio::task::spawn_blocking(move || -> Result<OutputDocument> {
        if let Some(order) = order {
            let order = parse_selection_in_order(&order, source.page_count());
            return Ok(reorder_document(&source, &order, &base_name)?);
        }

        let mut session = ReorderSession::for_source(&source);
        for (page, position) in moves {
            let id = entry_for_page(&session, page)?;
            session.move_page(id, position.saturating_sub(1));
        }
        for page in removes {
            let id = entry_for_page(&session, page)?;
            session.remove_page(id);
        }
        Ok(session.commit(&source, &base_name)?)
    })
    .await??;

    let target = output.unwrap_or_else(|| path.with_file_name(&document.name));
    write_output(&target, &document.bytes).await?;
    println!("Wrote {}", target.display());

    Ok(())
}

pub async fn merge(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        documents.push(read_file(input).await?);
    }

    let merged = tokio::task::spawn_blocking(move || merge_documents(documents)).await??;
    let page_count = pagesplit_core::get_page_count(&merged)?;

    write_output(output, &merged).await?;
    println!(
        "Merged {} files ({} pages) into {}",
        inputs.len(),
        page_count,
        output.display()
    );

    Ok(())
}

pub async fn rebuild(path: &Path, output: Option<PathBuf>) -> Result<()> {
    let (source, base_name) = load_source(path).await?;
    let original_size = source.info().size_bytes;

    let rebuilt = tokio::task::spawn_blocking(move || rebuild_document(&source)).await??;

    let target =
        output.unwrap_or_else(|| path.with_file_name(format!("{}-rebuilt.pdf", base_name)));
    write_output(&target, &rebuilt).await?;
    println!(
        "Rebuilt {} ({} -> {} bytes)",
        target.display(),
        original_size,
        rebuilt.len()
    );

    Ok(())
}

pub async fn info(path: &Path) -> Result<()> {
    let (source, _) = load_source(path).await?;
    let info = source.info();

    println!("File:      {}", path.display());
    println!("Version:   {}", info.version);
    println!("Pages:     {}", info.page_count);
    println!("Size:      {} bytes", info.size_bytes);
    println!("Encrypted: {}", info.encrypted);
    if let Some(title) = &info.title {
        println!("Title:     {}", title);
    }
    if let Some(author) = &info.author {
        println!("Author:    {}", author);
    }

    println!();
    for (index, page) in PageInfo::all_from_source(&source).into_iter().enumerate() {
        match page {
            Ok(page) => println!(
                "Page {:>4}: {} x {} pt, rotated {}, {:?}",
                page.page_num, page.width, page.height, page.rotation, page.orientation
            ),
            Err(e) => println!("Page {:>4}: {}", index + 1, e),
        }
    }

    Ok(())
}

pub async fn preview(path: &Path, output_dir: &Path) -> Result<()> {
    let (source, base_name) = load_source(path).await?;
    let previews =
        tokio::task::spawn_blocking(move || collect_previews(&BlankPageRenderer, &source)).await?;

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let mut written = 0;
    for preview in previews {
        match preview {
            PagePreview::Ready { index, png } => {
                let target = output_dir.join(format!("{}-page-{}.png", base_name, index + 1));
                write_output(&target, &png).await?;
                written += 1;
            }
            PagePreview::Unavailable { index, reason } => {
                println!("Page {}: preview unavailable ({})", index + 1, reason);
            }
        }
    }

    println!("Wrote {} previews to {}", written, output_dir.display());
    Ok(())
}

pub async fn run(command_file: &Path) -> Result<()> {
    let json = tokio::fs::read_to_string(command_file)
        .await
        .with_context(|| format!("Failed to read {}", command_file.display()))?;

    let result = tokio::task::spawn_blocking(move || pagesplit_core::execute_json(&json)).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(error) = result.error {
        bail!(error);
    }
    Ok(())
}

async fn read_options(path: &Path) -> Result<SplitOptions> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid split options in {}", path.display()))
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn load_source(path: &Path) -> Result<(SourceDocument, String)> {
    let bytes = read_file(path).await?;
    let source = tokio::task::spawn_blocking(move || SourceDocument::load(&bytes))
        .await?
        .with_context(|| format!("Failed to open PDF: {}", path.display()))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document");
    Ok((source, base_name_of(file_name)))
}

async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// The session entry showing an original (1-based) page
fn entry_for_page(session: &ReorderSession, page: usize) -> Result<PageEntryId> {
    session
        .entries()
        .iter()
        .find(|entry| entry.original_index + 1 == page)
        .map(|entry| entry.id)
        .with_context(|| format!("Page {} is not in the document or was already removed", page))
}
