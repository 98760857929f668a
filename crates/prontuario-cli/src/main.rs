use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use prontuario_core::aggregate::{
    deduplicate_patients, month_total, search_summaries, similar_names, sort_by_recent,
};
use prontuario_core::format::display_or_missing;
use prontuario_core::{snapshot, ClinicConfig, Database, RecordExporter};

#[derive(Parser, Debug)]
#[command(
    name = "prontuario",
    version,
    about = "Consulta e exporta prontuários do banco local da clínica."
)]
struct Cli {
    /// Arquivo de configuração JSON.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Banco SQLite (sobrepõe o da configuração).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log detalhado.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Substitui os prontuários locais por um snapshot JSON.
    Import {
        /// Snapshot no formato id → campos.
        file: PathBuf,
    },
    /// Lista um resumo por paciente, em ordem alfabética.
    Pacientes {
        /// Filtra pelo nome (sem diferenciar maiúsculas).
        #[arg(short, long)]
        busca: Option<String>,
        /// Ordena pelo atendimento mais recente em vez do nome.
        #[arg(short, long)]
        recentes: bool,
    },
    /// Mostra todos os atendimentos de um paciente.
    Historico { nome: String },
    /// Totais mensais de um ano, ou de um único mês.
    Financeiro {
        #[arg(short, long)]
        ano: Option<i32>,
        #[arg(short, long)]
        mes: Option<u32>,
    },
    /// Agendamentos de um mês.
    Agenda {
        #[arg(short, long)]
        ano: Option<i32>,
        #[arg(short, long)]
        mes: Option<u32>,
    },
    /// Exporta histórico de paciente ou relatório financeiro.
    Exportar {
        #[command(subcommand)]
        alvo: ExportTarget,
        #[arg(short, long, value_enum, default_value_t = Formato::Json, global = true)]
        formato: Formato,
        /// Arquivo de saída (padrão: stdout).
        #[arg(short, long, global = true)]
        saida: Option<PathBuf>,
    },
    /// Pares de nomes de pacientes parecidos.
    Duplicados {
        /// Similaridade mínima (0 a 1).
        #[arg(short, long)]
        limiar: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
enum ExportTarget {
    Paciente { nome: String },
    Financeiro { ano: i32 },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Formato {
    Json,
    Csv,
}

fn load_config(cli: &Cli) -> anyhow::Result<ClinicConfig> {
    let mut config = match &cli.config {
        Some(path) => ClinicConfig::load(path)
            .with_context(|| format!("Não foi possível carregar {:?}", path))?,
        None => ClinicConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    if cli.verbose {
        config.log_level = "debug".to_string();
    }
    Ok(config)
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let level: tracing::Level = level
        .parse()
        .with_context(|| format!("Nível de log inválido: {}", level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn current_year_month() -> (i32, u32) {
    let today = chrono::Local::now().date_naive();
    (today.year(), today.month())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.log_level)?;

    let mut db = Database::open(&config.database_path)
        .with_context(|| format!("Não foi possível abrir {:?}", config.database_path))?;

    match cli.command {
        Command::Import { file } => {
            let data = std::fs::read_to_string(&file)
                .with_context(|| format!("Não foi possível ler {:?}", file))?;
            let records = snapshot::records_from_json(&data).context("Snapshot inválido")?;
            let count = db.import_records(&records)?;
            println!("{} prontuários importados", count);
        }

        Command::Pacientes { busca, recentes } => {
            let records = db.list_records()?;
            let mut summaries = deduplicate_patients(&records);
            if recentes {
                sort_by_recent(&mut summaries);
            }
            let query = busca.unwrap_or_default();

            for summary in search_summaries(&summaries, &query) {
                let latest = &summary.latest;
                println!(
                    "{}\t{}\t{} atendimento(s)\t{}",
                    summary.patient_name,
                    display_or_missing(latest.visit_date.as_deref()),
                    summary.visit_count,
                    display_or_missing(latest.contact.phone.as_deref()),
                );
            }
        }

        Command::Historico { nome } => {
            let visits = db.records_for_patient(&nome)?;
            if visits.is_empty() {
                bail!("Nenhum prontuário para {}", nome.trim());
            }
            for visit in &visits {
                println!(
                    "{}\t{} - {}\t{}\t{}\t{}",
                    display_or_missing(visit.visit_date.as_deref()),
                    display_or_missing(visit.start_time.as_deref()),
                    display_or_missing(visit.end_time.as_deref()),
                    display_or_missing(visit.amount.as_deref()),
                    display_or_missing(visit.visit_type.map(|t| t.as_str())),
                    display_or_missing(visit.status.map(|s| s.as_str())),
                );
            }
        }

        Command::Financeiro { ano, mes } => {
            let (current_year, _) = current_year_month();
            let year = ano.unwrap_or(current_year);
            let records = db.list_records()?;

            match mes {
                Some(month) if !(1..=12).contains(&month) => bail!("Mês inválido: {}", month),
                Some(month) => {
                    let total = month_total(&records, month, year);
                    println!(
                        "{:02}/{}\t{} atendimento(s)\tR$ {}",
                        month,
                        year,
                        total.visit_count,
                        total.total()
                    );
                }
                None => {
                    let report = RecordExporter::new(&db).financial_report(year)?;
                    for month in &report.months {
                        println!(
                            "{:<10}\t{:>3}\tR$ {}",
                            month.name, month.visit_count, month.total
                        );
                    }
                    println!(
                        "{:<10}\t{:>3}\tR$ {}",
                        "Total", report.visit_count, report.yearly_total
                    );
                }
            }
        }

        Command::Agenda { ano, mes } => {
            let (current_year, current_month) = current_year_month();
            let appointments = db.appointments_for_month(
                ano.unwrap_or(current_year),
                mes.unwrap_or(current_month),
            )?;
            for appointment in &appointments {
                println!(
                    "{}\t{} - {}\t{}\t{}",
                    appointment.display_date(),
                    appointment.start_time,
                    appointment.end_time,
                    appointment.patient_name,
                    appointment.location,
                );
            }
        }

        Command::Exportar {
            alvo,
            formato,
            saida,
        } => {
            let exporter =
                RecordExporter::new(&db).with_practitioner(config.practitioner_name.clone());
            let output = match alvo {
                ExportTarget::Paciente { nome } => {
                    let export = exporter.export_patient(&nome)?;
                    if export.visits.is_empty() {
                        bail!("Nenhum prontuário para {}", nome.trim());
                    }
                    match formato {
                        Formato::Json => export.to_json()?,
                        Formato::Csv => export.to_csv(),
                    }
                }
                ExportTarget::Financeiro { ano } => {
                    let report = exporter.financial_report(ano)?;
                    match formato {
                        Formato::Json => report.to_json()?,
                        Formato::Csv => report.to_csv(),
                    }
                }
            };

            match saida {
                Some(path) => {
                    std::fs::write(&path, output)
                        .with_context(|| format!("Não foi possível gravar {:?}", path))?;
                    tracing::info!(path = %path.display(), "Export written");
                }
                None => print!("{}", output),
            }
        }

        Command::Duplicados { limiar } => {
            let threshold = limiar.unwrap_or(config.similar_name_threshold);
            if !(0.0..=1.0).contains(&threshold) {
                bail!("Limiar deve estar entre 0 e 1: {}", threshold);
            }
            let records = db.list_records()?;
            let summaries = deduplicate_patients(&records);
            for pair in similar_names(&summaries, threshold) {
                println!("{:.3}\t{}\t{}", pair.similarity, pair.first, pair.second);
            }
        }
    }

    Ok(())
}
