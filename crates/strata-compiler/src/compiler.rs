//! Method and class lowering driver

use strata_xmir::{Maxs, XmlMethod, XmlProgram};
use tracing::{debug, info, warn};

use crate::analysis;
use crate::ast::Instruction;
use crate::config::CompileOptions;
use crate::error::{CompileError, CompileResult};
use crate::labels::LabelAllocator;
use crate::locals::LocalVariables;
use crate::parser::XmirParser;

/// Lowers every method of a program's top class
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile a program, failing as a whole if any method fails
    pub fn compile(&self, program: &XmlProgram) -> CompileResult<XmlProgram> {
        let class = program.top()?;
        let methods = class.methods();
        let class_name = class.name().unwrap_or("<unnamed>");
        info!(class = class_name, methods = methods.len(), "compiling program");

        let compiled = methods
            .iter()
            .map(|method| self.compile_method(method))
            .collect::<CompileResult<Vec<_>>>()?;

        let output = program.replace_top_class(class.replace_methods(compiled));
        info!(class = class_name, "compiled program");
        Ok(output)
    }

    /// Compile a serialized program
    pub fn compile_str(&self, xml: &str) -> CompileResult<String> {
        let program = XmlProgram::parse(xml)?;
        Ok(self.compile(&program)?.to_xml_string()?)
    }

    /// Lower one method; errors name the method and carry its input tree
    pub fn compile_method(&self, method: &XmlMethod) -> CompileResult<XmlMethod> {
        self.lower_method(method).map_err(|source| CompileError::Method {
            name: method.name().unwrap_or("<unnamed>").to_string(),
            descriptor: method.descriptor().unwrap_or("").to_string(),
            rendering: method.node().to_string(),
            source: Box::new(source),
        })
    }

    fn lower_method(&self, method: &XmlMethod) -> CompileResult<XmlMethod> {
        let name = method.name()?;
        let descriptor = method.descriptor()?;

        let mut labels = LabelAllocator::with_prefix(self.options.label_prefix.as_str());
        let mut locals = LocalVariables::from_method(method.access()?, descriptor)?;
        let nodes = XmirParser::new(&mut locals, &mut labels).parse_all(method.nodes())?;

        let mut instructions = Vec::new();
        for node in &nodes {
            instructions.extend(node.lower()?);
        }

        let lowered =
            method.replace_instructions(instructions.iter().map(Instruction::to_xmir).collect());
        let maxs = self.maxs(name, descriptor, &instructions, locals.frame_size());
        debug!(
            method = name,
            descriptor,
            instructions = instructions.len(),
            maxs = ?maxs,
            "lowered method"
        );
        Ok(match maxs {
            Maxs::Computed { .. } => lowered.with_maxs(maxs),
            Maxs::Stale => lowered,
        })
    }

    fn maxs(
        &self,
        name: &str,
        descriptor: &str,
        instructions: &[Instruction],
        frame_size: u16,
    ) -> Maxs {
        if !self.options.compute_maxs {
            return Maxs::Stale;
        }
        match analysis::max_stack(instructions) {
            Some(stack) => Maxs::Computed {
                stack,
                locals: analysis::max_locals(instructions, frame_size),
            },
            None => {
                warn!(method = name, descriptor, "stack depth is unknown, leaving maxs stale");
                Maxs::Stale
            }
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}
