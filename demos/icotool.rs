use clap::{App, Arg, SubCommand};
use std::fs;
use std::path::PathBuf;
use std::process;

//===========================================================================//

fn main() {
    env_logger::init();
    let matches = App::new("icotool")
        .version("0.1")
        .about("Packs PNG images into ICO files and unpacks them")
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates an ICO file from PNG files")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(Arg::with_name("image").multiple(true).required(true)),
        )
        .subcommand(
            SubCommand::with_name("extract")
                .about("Extracts an image from an ICO file as a PNG")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(Arg::with_name("ico").required(true))
                .arg(Arg::with_name("index").required(true)),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists images in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    let result = if let Some(submatches) = matches.subcommand_matches("create")
    {
        let out_path = if let Some(path) = submatches.value_of("output") {
            PathBuf::from(path)
        } else {
            let mut path = PathBuf::from("out.ico");
            let mut index: i32 = 0;
            while path.exists() {
                index += 1;
                path = PathBuf::from(format!("out{}.ico", index));
            }
            path
        };
        let paths: Vec<&str> =
            submatches.values_of("image").into_iter().flatten().collect();
        create(&paths, out_path)
    } else if let Some(submatches) = matches.subcommand_matches("extract") {
        let path = submatches.value_of("ico").unwrap_or_default();
        let index = submatches.value_of("index").unwrap_or_default();
        let out_path = submatches.value_of("output").map(PathBuf::from);
        extract(path, index, out_path)
    } else if let Some(submatches) = matches.subcommand_matches("list") {
        list(submatches.value_of("ico").unwrap_or_default())
    } else {
        Ok(())
    };
    if let Err(error) = result {
        eprintln!("icotool: {}", error);
        process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn create(paths: &[&str], out_path: PathBuf) -> CliResult {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        println!("Adding {:?}", path);
        let file = fs::File::open(path)?;
        images.push(icopack::DecodedImage::read_png(file)?);
    }
    let out_file = fs::File::create(out_path)?;
    icopack::write_ico(&images, out_file)?;
    Ok(())
}

fn extract(
    path: &str,
    index: &str,
    out_path: Option<PathBuf>,
) -> CliResult {
    let index = index.parse::<usize>()?;
    let images = icopack::read_ico(fs::File::open(path)?)?;
    let image = match images.get(index) {
        Some(image) => image,
        None => {
            return Err(format!(
                "{} has only {} images, but index is {}",
                path,
                images.len(),
                index
            )
            .into())
        }
    };
    let out_path = out_path
        .unwrap_or_else(|| PathBuf::from(format!("{}.{}.png", path, index)));
    image.write_png(fs::File::create(out_path)?)?;
    Ok(())
}

fn list(path: &str) -> CliResult {
    let icondir = icopack::IconDir::read(fs::File::open(path)?)?;
    for (index, entry) in icondir.entries().iter().enumerate() {
        println!(
            "{:5}: {}x{} {} bpp, {} bytes at offset {}",
            index,
            entry.width(),
            entry.height(),
            entry.bits_per_pixel(),
            entry.data_size(),
            entry.data_offset()
        );
    }
    Ok(())
}

//===========================================================================//
