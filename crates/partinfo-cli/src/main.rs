//! Partinfo CLI - inspect partition tables of raw disk images
//!
//! Resolves MBR and GPT layouts, including logical partitions in EBR
//! chains, and prints them as a table or as JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use partinfo_core::{PartitionEntry, PartitionType};
use partinfo_tables::{get, get_partitions, ResolveOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "partinfo")]
#[command(about = "Read MBR/GPT partition tables from disk images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// List all partitions of an image
    List {
        /// Path to the disk image
        image: PathBuf,

        /// Byte offset of the partition table
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Leave the extended partition out of the listing
        #[arg(long)]
        no_extended: bool,

        /// Do not walk the EBR chain for logical partitions
        #[arg(long)]
        no_logical: bool,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a single partition by its number (/dev/sdaN convention)
    Get {
        /// Path to the disk image
        image: PathBuf,

        /// 1-based partition number; logical partitions start at 5
        number: u32,

        /// Print the partition as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .init();

    match cli.command {
        Command::List {
            image,
            offset,
            no_extended,
            no_logical,
            json,
        } => {
            let options = ResolveOptions {
                offset,
                include_extended: !no_extended,
                get_logical: !no_logical,
            };
            let table = get_partitions(image.as_path(), &options)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
                return Ok(());
            }

            println!("Partition table: {}", table.kind);
            println!();

            if table.partitions.is_empty() {
                println!("No partitions found.");
                return Ok(());
            }

            println!(
                "{:<7} {:<13} {:<13} {:<24}",
                "Number", "Offset", "Size", "Type"
            );
            println!("{}", "-".repeat(60));
            for partition in &table.partitions {
                println!(
                    "{:<7} {:<13} {:<13} {:<24}",
                    partition.index,
                    format_bytes(partition.offset),
                    format_bytes(partition.size),
                    describe_type(partition)
                );
            }
        }

        Command::Get { image, number, json } => {
            let partition = get(image.as_path(), number)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&partition)?);
                return Ok(());
            }

            println!("Number: {}", partition.index);
            println!("Offset: {} ({})", partition.offset, format_bytes(partition.offset));
            println!("Size:   {} ({})", partition.size, format_bytes(partition.size));
            println!("Type:   {}", describe_type(&partition));
        }
    }

    Ok(())
}

fn describe_type(partition: &PartitionEntry) -> String {
    match partition.partition_type {
        PartitionType::Mbr(t) => {
            format!("0x{:02X} ({})", t, partinfo_tables::mbr::type_name(t))
        }
        PartitionType::Gpt(guid) => {
            format!("{} ({})", guid, partinfo_tables::gpt::type_guid_name(&guid))
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else if bytes < 1_073_741_824 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    }
}
