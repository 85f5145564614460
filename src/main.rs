use anyhow::Context;
use clap::Parser;
use defect_report::{cli, config, document, pipeline, prompt};
use cli::{Cli, Commands};
use config::Config;
use document::Document;
use inspection_common::{Severity, ViolationPolicy};
use pipeline::ReportRun;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = fmt().with_env_filter(filter).with_target(false).finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("ログ出力は初期化済みです");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Run {
            images,
            template,
            output,
            no_strip,
            abort_on_violation,
        } => {
            println!("📸 defect-report - 報告書生成\n");

            let mut config = config;
            if let Some(images) = images {
                config.image_dir = images;
            }
            if let Some(template) = template {
                config.template_path = template;
            }
            if no_strip {
                config.strip_metadata = false;
            }
            if abort_on_violation {
                config.violation_policy = ViolationPolicy::Abort;
            }

            println!("報告書を生成中... ({})", config.image_dir.display());
            let timeout = Duration::from_secs(config.prompt_timeout_secs);
            let default_name = config.default_output_name.clone();
            let mut run = ReportRun::new(config);

            let summary = run
                .execute(|| match output {
                    Some(name) => name,
                    None => prompt::timed_input("報告書名を入力してください", &default_name, timeout)
                        .into_value(),
                })
                .context("報告書の生成に失敗しました")?;

            println!(
                "✔ 危急 {} / 严重 {} / 一般 {} 枚（特写 {} 枚）\n",
                summary.tier_counts[0], summary.tier_counts[1], summary.tier_counts[2], summary.close_ups
            );
            if !summary.violations.is_empty() {
                println!("⚠ 命名違反で除外: {}枚", summary.violations.len());
                for v in &summary.violations {
                    println!("  - {} ({})", v.file_name, v.reason);
                }
            }
            if !summary.misses.is_empty() {
                println!("⚠ 類別未解決: {}", summary.misses.join(", "));
            }
            for orphan in &summary.orphan_close_ups {
                println!("⚠ 対応する写真のない特写: {}", orphan);
            }

            match &summary.strip {
                Some(strip) => println!(
                    "メタデータ除去: {}枚（EXIFあり {}枚）",
                    strip.processed, strip.had_metadata
                ),
                None => println!("メタデータ除去: スキップ"),
            }
            println!(
                "構造調整: 明細表 +{:?} / 汇总表の行 +{:?}",
                summary.reconcile.detail_tables_added, summary.reconcile.ledger_rows_added
            );
            println!("報告書: {}", summary.output_path.display());
            println!("\n✅ 完了（缺陷 {} 件）", run.statistics().photo_count());
        }

        Commands::Classify {
            images,
            abort_on_violation,
        } => {
            let mut config = config;
            if let Some(images) = images {
                config.image_dir = images;
            }
            if abort_on_violation {
                config.violation_policy = ViolationPolicy::Abort;
            }

            let run = ReportRun::new(config);
            let batch = run.classify().context("写真の分類に失敗しました")?;

            for severity in Severity::ALL {
                let records = batch.tier(severity);
                println!("{}: {}枚", severity.label(), records.len());
                for record in records {
                    let category = record.category.map(|c| c.label()).unwrap_or("未分類");
                    let close_up = if record.close_up_ref.is_some() { " [特写]" } else { "" };
                    println!("  - {} ({}){}", record.file_name, category, close_up);
                }
            }
            for orphan in &batch.orphan_close_ups {
                println!("⚠ 対応する写真のない特写: {}", orphan);
            }
            for v in &batch.violations {
                println!("⚠ 命名違反: {} ({})", v.file_name, v.reason);
            }
        }

        Commands::InitTemplate { output } => {
            let path = output.unwrap_or_else(|| config.template_path.clone());
            document::template::standard_template()
                .save(&path)
                .with_context(|| format!("テンプレートを保存できません: {}", path.display()))?;
            println!("✔ テンプレートを作成: {}", path.display());
        }

        Commands::Export { input, output } => {
            let doc = Document::open(&input)
                .with_context(|| format!("文書を開けません: {}", input.display()))?;
            if !output
                .extension()
                .map(|e| e.eq_ignore_ascii_case("docx"))
                .unwrap_or(false)
            {
                anyhow::bail!("出力ファイルの拡張子は .docx にしてください: {}", output.display());
            }
            doc.save(&output)
                .with_context(|| format!("DOCXを出力できません: {}", output.display()))?;
            println!("✔ DOCXを出力: {}", output.display());
        }

        Commands::Config { show, init } => {
            if init {
                Config::default().save()?;
                println!("✔ 設定ファイルを作成: {}", Config::config_path()?.display());
            }

            if show || !init {
                println!("設定:");
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
