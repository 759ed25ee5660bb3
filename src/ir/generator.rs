use std::fmt::{Display, Formatter};

use crate::semantic::types::Type;

/// Records declaration notifications from the semantic pass: static
/// int/float slots (with array sizes), functions, and parameters. Slots
/// declared while a function is active belong to that function, otherwise
/// to the program.
#[derive(Debug, Default)]
pub struct IrGenerator {
    program: Option<IrProgram>,
    active: Option<IrFunction>,
}

impl IrGenerator {
    pub fn new() -> Self {
        IrGenerator {
            program: None,
            active: None,
        }
    }

    pub fn start_program(&mut self, name: &str) {
        self.program = Some(IrProgram {
            name: name.to_string(),
            int_list: vec![],
            float_list: vec![],
            functions: vec![],
        });
    }

    pub fn start_function(&mut self, name: &str, return_type: &Type) {
        self.end_function();
        self.active = Some(IrFunction {
            name: name.to_string(),
            return_type: return_type.to_string(),
            params: vec![],
            int_list: vec![],
            float_list: vec![],
        });
    }

    pub fn end_function(&mut self) {
        if let (Some(function), Some(program)) = (self.active.take(), self.program.as_mut()) {
            program.functions.push(function);
        }
    }

    pub fn add_int(&mut self, name: &str, arr_size: u32) {
        if let Some(function) = self.active.as_mut() {
            function.int_list.push((name.to_string(), arr_size));
        } else if let Some(program) = self.program.as_mut() {
            program.int_list.push((name.to_string(), arr_size));
        }
    }

    pub fn add_float(&mut self, name: &str, arr_size: u32) {
        if let Some(function) = self.active.as_mut() {
            function.float_list.push((name.to_string(), arr_size));
        } else if let Some(program) = self.program.as_mut() {
            program.float_list.push((name.to_string(), arr_size));
        }
    }

    /// Parameters are recorded in the signature and as a scalar slot of
    /// their base type.
    pub fn add_param(&mut self, name: &str, ty: &Type) {
        let Some(function) = self.active.as_mut() else {
            return;
        };
        function.params.push((name.to_string(), ty.to_string()));
        if ty.to_string() == "int" {
            function.int_list.push((name.to_string(), 0));
        } else {
            function.float_list.push((name.to_string(), 0));
        }
    }
}

impl Display for IrGenerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some(program) = &self.program else {
            return Ok(());
        };

        writeln!(f, "start-program {}", program.name)?;
        writeln!(f, "\tstatic-int-list: {}", vars_list(&program.int_list))?;
        writeln!(f, "\tstatic-float-list: {}", vars_list(&program.float_list))?;

        for function in &program.functions {
            writeln!(f)?;
            writeln!(f, "start-function {}", function.name)?;
            writeln!(
                f,
                "\t{} {} ({})",
                function.return_type,
                function.name,
                param_list(&function.params)
            )?;
            writeln!(f, "\tstatic-int-list: {}", vars_list(&function.int_list))?;
            writeln!(f, "\tstatic-float-list: {}", vars_list(&function.float_list))?;
            writeln!(f, "\t{}:", function.name)?;
            writeln!(f, "end-function {}", function.name)?;
        }

        write!(f, "\nend-program {}", program.name)
    }
}

#[derive(Debug)]
struct IrProgram {
    name: String,
    int_list: Vec<(String, u32)>,
    float_list: Vec<(String, u32)>,
    functions: Vec<IrFunction>,
}

#[derive(Debug)]
struct IrFunction {
    name: String,
    return_type: String,
    params: Vec<(String, String)>,
    int_list: Vec<(String, u32)>,
    float_list: Vec<(String, u32)>,
}

fn vars_list(vars: &[(String, u32)]) -> String {
    let mut list = String::new();
    for (i, (name, arr_size)) in vars.iter().enumerate() {
        if i != 0 {
            list.push_str(", ");
        }
        list.push_str(name);
        if *arr_size != 0 {
            list.push_str(&format!("[{}]", arr_size));
        }
    }
    list
}

fn param_list(params: &[(String, String)]) -> String {
    let mut list = String::new();
    for (i, (name, ty)) in params.iter().enumerate() {
        if i != 0 {
            list.push_str(", ");
        }
        list.push_str(&format!("{} {}", ty, name));
    }
    list
}
