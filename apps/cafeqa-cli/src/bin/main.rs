use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cafeqa_answer::{preview, CafeteriaRag};
use cafeqa_core::config::{Config, Settings};
use cafeqa_core::dataset::{Dataset, DOCUMENTS_SPLIT, QA_SPLIT};
use cafeqa_core::types::Record;

const EXIT_COMMANDS: [&str; 3] = ["salir", "exit", "quit"];
const SUMMARY_PREVIEW_CHARS: usize = 180;

/// Preguntas sobre los precios de las cafeterías, respondidas desde la FAQ o el PDF.
#[derive(Parser, Debug)]
#[command(name = "cafeqa", version)]
struct Cli {
    /// Inicia un modo interactivo para hacer preguntas.
    #[arg(short, long)]
    interactive: bool,

    /// Responde una única pregunta y termina.
    #[arg(short, long, conflicts_with = "interactive")]
    question: Option<String>,

    /// Número de fragmentos del PDF mostrados como evidencia (por defecto `answer.top_k_docs`).
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Directorio con la FAQ y el PDF (sobrescribe `data.dir`).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directorio de páginas `.txt` a usar en lugar del PDF.
    #[arg(long)]
    pages_dir: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(&cli)?;
    debug!(?settings, "settings loaded");
    let rag = CafeteriaRag::build_with_progress(&settings, true).context("failed to prepare the cafeteria dataset")?;
    let top_k = cli.top_k.unwrap_or(settings.answer.top_k_docs);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.interactive {
        interactive_loop(&rag, top_k, io::stdin().lock(), &mut out)?;
    } else if let Some(question) = &cli.question {
        writeln!(out, "{}", rag.answer(question, top_k)?)?;
    } else {
        write_summary(rag.dataset(), &mut out)?;
    }
    Ok(())
}

/// Logs go to stderr so answers on stdout stay clean.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "cafeqa=debug" } else { "cafeqa=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Config::load().and_then(|c| c.settings()).context("failed to load configuration")?;
    if let Some(dir) = &cli.data_dir {
        settings.data.dir = dir.display().to_string();
    }
    if let Some(dir) = &cli.pages_dir {
        settings.data.pages_dir = dir.display().to_string();
    }
    Ok(settings)
}

fn field(record: &Record, key: &str) -> String {
    record.get(key).map(ToString::to_string).unwrap_or_default()
}

fn write_summary<W: Write>(dataset: &Dataset, out: &mut W) -> io::Result<()> {
    let (Some(qa), Some(docs)) = (dataset.split(QA_SPLIT), dataset.split(DOCUMENTS_SPLIT)) else { return Ok(()) };

    writeln!(out, "GDG UAM RAG dataset listo.")?;
    writeln!(out, "- Pares de preguntas/respuestas: {}", qa.num_rows())?;
    writeln!(out, "- Fragmentos del PDF: {}", docs.num_rows())?;

    if let Some(row) = qa.row(0) {
        writeln!(out, "\nEjemplo de QA:")?;
        writeln!(out, "  Pregunta: {}", field(&row, "question"))?;
        writeln!(out, "  Respuesta: {}", field(&row, "answer"))?;
    }
    if let Some(row) = docs.row(0) {
        writeln!(out, "\nEjemplo de fragmento del PDF:")?;
        writeln!(out, "  ID: {} (página {})", field(&row, "id"), field(&row, "page"))?;
        writeln!(out, "  Texto: {}", preview(&field(&row, "text"), SUMMARY_PREVIEW_CHARS))?;
    }
    Ok(())
}

fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS.iter().any(|c| c.eq_ignore_ascii_case(input))
}

fn interactive_loop<R: BufRead, W: Write>(rag: &CafeteriaRag, top_k: usize, input: R, out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Modo interactivo RAG - GDG UAM")?;
    writeln!(out, "Escribe tu pregunta sobre la cafetería y pulsa Enter.")?;
    writeln!(out, "Comandos especiales: 'salir', 'exit', 'quit'.\n")?;

    let mut lines = input.lines();
    loop {
        write!(out, "Pregunta> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out, "\nHasta luego 👋")?;
            break;
        };
        let line = line?;
        let question = line.trim();
        if question.is_empty() { continue; }
        if is_exit_command(question) {
            writeln!(out, "Hasta luego 👋")?;
            break;
        }
        match rag.answer(question, top_k) {
            Ok(answer) => writeln!(out, "\n{answer}\n")?,
            Err(e) if e.is_recoverable() => writeln!(out, "[Error] {e}")?,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
