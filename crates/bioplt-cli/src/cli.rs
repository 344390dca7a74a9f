use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use bioplt::composite::split_to_masks;
use bioplt::file::{
    build_packed_image_from_canvas, decode_file, encode_file, load_canvas,
};
use bioplt::host::mem::MemHost;
use bioplt::{MATERIAL_COUNT, Material, PackedImage, SENTINEL};

/// A command line tool for working with Packed Layer Texture (.plt) files.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: Command,
}

impl Cli {
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        self.command.run()
    }
}

#[derive(Subcommand)]
enum Command {
    /// Prints the dimensions and per-material pixel counts of a PLT file.
    Info(Info),

    /// Extracts each non-empty material layer as a grayscale PGM image.
    Extract(Extract),

    /// Decodes a PLT file into an in-memory canvas and re-encodes it,
    /// normalizing the header and dropping out-of-catalog material tags.
    Rewrite(Rewrite),
}

impl Command {
    fn run(&self) -> anyhow::Result<()> {
        match self {
            Command::Info(info) => info.run(),
            Command::Extract(extract) => extract.run(),
            Command::Rewrite(rewrite) => rewrite.run(),
        }
    }
}

#[derive(Parser)]
struct Info {
    /// The PLT file to inspect.
    path: PathBuf,
}

impl Info {
    fn run(&self) -> anyhow::Result<()> {
        let image = decode_file(&self.path)?;
        println!("{}: {}x{}", self.path.display(), image.width(), image.height());

        let mut counts = [0usize; MATERIAL_COUNT];
        let mut background = 0usize;
        let mut unknown = 0usize;
        for pixel in image.pixels() {
            if *pixel == SENTINEL {
                background += 1;
            } else if let Some(slot) = counts.get_mut(usize::from(pixel.material)) {
                *slot += 1;
            } else {
                unknown += 1;
            }
        }

        for (material, count) in Material::ALL.into_iter().zip(counts) {
            println!("  {:<10} {count}", material.name());
        }
        println!("  {:<10} {background}", "background");
        if unknown > 0 {
            println!("  {:<10} {unknown}", "unknown");
        }
        Ok(())
    }
}

#[derive(Parser)]
struct Extract {
    /// The PLT file to extract layers from.
    path: PathBuf,

    /// Directory to write the PGM files into.
    #[clap(short, long, default_value = ".")]
    output: PathBuf,
}

impl Extract {
    fn run(&self) -> anyhow::Result<()> {
        let image = decode_file(&self.path)?;
        fs::create_dir_all(&self.output)?;

        let mut written = 0;
        for mask in split_to_masks(&image) {
            if mask.is_empty() {
                continue;
            }
            let filename = self.output.join(format!("{}.pgm", mask.material().name()));
            eprintln!(
                "Writing layer {name} to {filename}",
                name = mask.material().name(),
                filename = filename.display()
            );
            let intensities: Vec<u8> =
                mask.data().chunks_exact(2).map(|pair| pair[0]).collect();
            write_pgm(&filename, mask.width(), mask.height(), &intensities)?;
            written += 1;
        }
        if written == 0 {
            eprintln!("No non-empty material layers found");
        }
        Ok(())
    }
}

fn write_pgm(path: &Path, width: u32, height: u32, data: &[u8]) -> anyhow::Result<()> {
    let mut file = fs::File::create(path)?;
    write!(file, "P5\n{width} {height}\n255\n")?;
    file.write_all(data)?;
    Ok(())
}

#[derive(Parser)]
struct Rewrite {
    /// The PLT file to read.
    input: PathBuf,

    /// The PLT file to write.
    output: PathBuf,
}

impl Rewrite {
    fn run(&self) -> anyhow::Result<()> {
        let mut host = MemHost::new();
        let canvas = load_canvas(&mut host, &self.input)?;
        let rebuilt: PackedImage = build_packed_image_from_canvas(&host, &canvas)?;
        encode_file(&self.output, &rebuilt)?;
        eprintln!(
            "Rewrote {input} ({width}x{height}) to {output}",
            input = self.input.display(),
            width = rebuilt.width(),
            height = rebuilt.height(),
            output = self.output.display()
        );
        Ok(())
    }
}
