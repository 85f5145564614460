use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "defect-report")]
#[command(about = "送電線巡視の缺陷写真分類・報告書生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真フォルダから報告書を生成
    Run {
        /// 写真フォルダ（省略時は設定値）
        #[arg(short, long)]
        images: Option<PathBuf>,

        /// テンプレート文書（init-template が書き出す JSON 形式のみ。Word の .docx は読めない）
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// 報告書名（省略時は対話入力）
        #[arg(short, long)]
        output: Option<String>,

        /// メタデータ除去をしない
        #[arg(long)]
        no_strip: bool,

        /// 命名違反が1つでもあれば中止
        #[arg(long)]
        abort_on_violation: bool,
    },

    /// 分類結果だけを表示（文書は生成しない）
    Classify {
        /// 写真フォルダ（省略時は設定値）
        #[arg(short, long)]
        images: Option<PathBuf>,

        /// 命名違反が1つでもあれば中止
        #[arg(long)]
        abort_on_violation: bool,
    },

    /// 標準テンプレート文書を書き出す
    InitTemplate {
        /// 出力先（省略時は設定のテンプレートパス）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 保存済みの文書を DOCX に変換
    Export {
        /// 入力文書（JSON）
        #[arg(short, long, required = true)]
        input: PathBuf,

        /// 出力ファイル（.docx）
        #[arg(short, long, required = true)]
        output: PathBuf,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,
    },
}
