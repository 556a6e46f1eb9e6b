use clap::App;
use clap::Arg;
use huffcode_logger as logger;
use huffcode_tools::encode_file;
use huffcode_tools::output_path;
use huffcode_tools::write_code_table;
use std::error::Error;
use std::io;
use std::path::Path;
use std::process;

fn main() {
    logger::init();
    let matches = App::new("Huffman encoder")
        .about("Encodes a file with a Huffman code built from its own byte frequencies")
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the file to encode")
                .required(true),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Sets the path to write to, defaults to INPUT with `_coded.bin` appended"),
        )
        .arg(
            Arg::with_name("QUIET")
                .short("q")
                .long("quiet")
                .help("Doesn't print the code table"),
        )
        .arg(
            Arg::with_name("HEXDUMP")
                .long("hexdump")
                .help("Prints a hexdump of the encoded data"),
        )
        .get_matches();

    let input = Path::new(matches.value_of_os("INPUT").unwrap());
    let output = match matches.value_of_os("OUTPUT") {
        Some(o) => Path::new(o).to_owned(),
        None => output_path(input),
    };
    let quiet = matches.is_present("QUIET");
    let hexdump = matches.is_present("HEXDUMP");
    if let Err(err) = run(input, &output, quiet, hexdump) {
        println!("Error: {}", err);
        process::exit(-1);
    }
}

fn run(input: &Path, output: &Path, quiet: bool, hexdump: bool) -> Result<(), Box<dyn Error>> {
    let (encoded, elapsed) = encode_file(input, output)?;
    if !quiet {
        write_code_table(io::stdout().lock(), &encoded.codes)?;
    }
    if hexdump {
        hexdump::hexdump(&encoded.packed);
    }
    println!("Execution time: {} milliseconds", elapsed.as_millis());
    println!(
        "Encoded {} bits into {} bytes, written to {}",
        encoded.bit_len,
        encoded.packed.len(),
        output.display()
    );
    Ok(())
}
