use std::{env, fs, process, rc::Rc};

use tigerc::{
    errors::errors::ExitStatus, lexer::lexer::tokenize, parser::parser::parse,
    semantic::checker::check,
};

fn main() {
    process::exit(run().code());
}

fn run() -> ExitStatus {
    let args: Vec<String> = env::args().collect();

    let mut source_path = None;
    let mut save_symbol_table = false;
    let mut build_ir = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-i" => {
                i += 1;
                source_path = args.get(i).cloned();
            }
            "-st" => save_symbol_table = true,
            "-ir" => build_ir = true,
            _ => {}
        }
        i += 1;
    }

    let Some(source_path) = source_path else {
        eprintln!("usage: tigerc -i <file.tiger> [-st] [-ir]");
        return ExitStatus::ArgumentError;
    };

    let source = match fs::read_to_string(&source_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("failed to read {}: {}", source_path, error);
            return ExitStatus::ArgumentError;
        }
    };

    let file_name = source_path
        .rsplit('/')
        .next()
        .unwrap_or(source_path.as_str())
        .to_string();
    let file = Rc::new(file_name.clone());

    // A lexical or syntax failure terminates compilation immediately; the
    // checker is never entered.
    let tokens = match tokenize(source, Some(file_name)) {
        Ok(tokens) => tokens,
        Err(error) => {
            eprintln!("{}", error);
            return ExitStatus::LexicalError;
        }
    };

    let (_, program) = parse(tokens, Rc::clone(&file));
    let program = match program {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{}", error);
            return ExitStatus::SyntaxError;
        }
    };

    let checker = check(&program, file);
    for error in checker.errors() {
        eprintln!("{}", error);
    }

    // The requested outputs are written even when semantic errors were
    // recorded; only the exit status reflects them.
    if save_symbol_table {
        let path = output_path(&source_path, "st");
        if let Err(error) = fs::write(&path, checker.symbol_table().report()) {
            eprintln!("failed to write {}: {}", path, error);
        }
    }
    if build_ir {
        let path = output_path(&source_path, "ir");
        if let Err(error) = fs::write(&path, checker.ir().to_string()) {
            eprintln!("failed to write {}: {}", path, error);
        }
    }

    if checker.semantic_error_occurred() {
        ExitStatus::SemanticError
    } else {
        ExitStatus::NoError
    }
}

/// `foo.tiger` becomes `foo.st` / `foo.ir`; anything else gets the
/// extension appended.
fn output_path(source_path: &str, extension: &str) -> String {
    match source_path.strip_suffix("tiger") {
        Some(stem) => format!("{}{}", stem, extension),
        None => format!("{}.{}", source_path, extension),
    }
}
