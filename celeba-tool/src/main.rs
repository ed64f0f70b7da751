use anyhow::{ensure, Context, Result};
use celeba_dl::{
    config::DatasetConfig,
    dataset::FaceDataset,
    processor::{Identity, ImageDecoder, Transform},
};
use clap::{Args, Parser};
use image::RgbImage;
use prettytable::{cell, row, Table};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
/// Inspect a CelebA dataset directory.
enum Opts {
    /// Print the attribute schema and attribute frequencies.
    Info {
        #[clap(flatten)]
        dataset: DatasetOpts,
    },
    /// Decode one image and print its attributes.
    Show {
        #[clap(flatten)]
        dataset: DatasetOpts,
        /// record index
        index: usize,
    },
}

#[derive(Debug, Clone, Args)]
struct DatasetOpts {
    /// dataset configuration file, other options override its values
    #[clap(long)]
    config_file: Option<PathBuf>,
    /// dataset root directory
    #[clap(long)]
    root_dir: Option<PathBuf>,
    /// keep a random subset of this many images
    #[clap(long)]
    subset_size: Option<usize>,
    /// seed of subset sampling
    #[clap(long)]
    seed: Option<u64>,
}

impl DatasetOpts {
    fn load_config(&self) -> Result<DatasetConfig> {
        let mut config = match &self.config_file {
            Some(config_file) => DatasetConfig::open(config_file).with_context(|| {
                format!("failed to load config file '{}'", config_file.display())
            })?,
            None => DatasetConfig::default(),
        };

        if let Some(root_dir) = &self.root_dir {
            config.root_dir = root_dir.clone();
        }
        if self.subset_size.is_some() {
            config.subset_size = self.subset_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::parse() {
        Opts::Info { dataset } => info(&dataset.load_config()?)?,
        Opts::Show { dataset, index } => show(&dataset.load_config()?, index)?,
    }

    Ok(())
}

fn info(config: &DatasetConfig) -> Result<()> {
    let dataset = config
        .build_with(Identity)
        .with_context(|| format!("failed to open dataset '{}'", config.root_dir.display()))?;

    println!("image directory: {}", dataset.image_dir().display());
    println!("images: {}", dataset.len());
    println!("annotated files: {}", dataset.index().len());
    if let Some((declared, parsed)) = dataset.index().record_count_mismatch() {
        println!(
            "record count mismatch: {} declared, {} found",
            declared, parsed
        );
    }
    println!("attributes: {}", dataset.attribute_count());

    // print attribute frequencies
    {
        let frequencies = dataset.attribute_frequencies();
        let num_images = dataset.len().max(1) as f64;

        let mut table = Table::new();
        table.add_row(row!["index", "attribute", "count", "ratio"]);

        dataset
            .schema()
            .iter()
            .zip(frequencies.iter())
            .enumerate()
            .for_each(|(index, (name, &count))| {
                table.add_row(row![
                    index,
                    name,
                    count,
                    format!("{:.4}", count as f64 / num_images)
                ]);
            });

        table.printstd();
    }

    Ok(())
}

fn show(config: &DatasetConfig, index: usize) -> Result<()> {
    let dataset = config
        .build_with(Identity)
        .with_context(|| format!("failed to open dataset '{}'", config.root_dir.display()))?;
    print_record(&dataset, index)
}

fn print_record<T, D>(dataset: &FaceDataset<T, D>, index: usize) -> Result<()>
where
    T: Transform<RgbImage, Output = RgbImage>,
    D: ImageDecoder,
{
    ensure!(
        index < dataset.len(),
        "index {} is out of range, the dataset has {} images",
        index,
        dataset.len()
    );

    let file_record = dataset.file_record(index)?;
    let image = dataset
        .get(index)
        .with_context(|| format!("failed to load image file '{}'", file_record.path.display()))?
        .image;
    let (width, height) = image.dimensions();

    println!("file: {}", file_record.path.display());
    println!("size: {}x{}", width, height);

    let mut table = Table::new();
    table.add_row(row!["attribute", "present"]);
    dataset
        .schema()
        .iter()
        .zip(file_record.attributes.iter())
        .for_each(|(name, &value)| {
            table.add_row(row![name, value == 1]);
        });
    table.printstd();

    Ok(())
}
