//! Typed value model
//!
//! Primitive and reference types as the stack machine sees them, together
//! with field and method descriptor parsing.

use std::fmt;
use thiserror::Error;

/// Internal name of the universal base type
pub const OBJECT: &str = "java/lang/Object";

/// Descriptor parsing errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptorError {
    /// Empty descriptor
    #[error("Empty type descriptor")]
    Empty,

    /// Unexpected character
    #[error("Invalid type descriptor '{descriptor}' at position {position}")]
    Invalid {
        /// Descriptor being parsed
        descriptor: String,
        /// Byte offset of the offending character
        position: usize,
    },

    /// Class name without the closing `;`
    #[error("Unterminated class name in descriptor '{descriptor}'")]
    UnterminatedClassName {
        /// Descriptor being parsed
        descriptor: String,
    },

    /// Method descriptor expected
    #[error("'{descriptor}' is not a method descriptor")]
    NotAMethod {
        /// Descriptor being parsed
        descriptor: String,
    },

    /// Parameter declared as void
    #[error("Void parameter in method descriptor '{descriptor}'")]
    VoidParameter {
        /// Descriptor being parsed
        descriptor: String,
    },
}

/// A statically known value type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JvmType {
    /// No value
    Void,
    /// `boolean`
    Boolean,
    /// `char`
    Char,
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// 32-bit integer
    Int,
    /// 32-bit float
    Float,
    /// 64-bit integer
    Long,
    /// 64-bit float
    Double,
    /// Array of the element type
    Array(Box<JvmType>),
    /// Class or interface, by internal name (`java/lang/String`)
    Object(String),
}

impl JvmType {
    /// Reference type from an internal or dotted class name
    pub fn object(name: impl Into<String>) -> Self {
        let name: String = name.into();
        JvmType::Object(name.replace('.', "/"))
    }

    /// Parse a single field descriptor such as `I`, `[J` or `Ljava/lang/String;`
    pub fn from_descriptor(descriptor: &str) -> Result<Self, DescriptorError> {
        if descriptor.is_empty() {
            return Err(DescriptorError::Empty);
        }
        let (ty, end) = parse_field(descriptor, 0)?;
        if end != descriptor.len() {
            return Err(DescriptorError::Invalid {
                descriptor: descriptor.to_string(),
                position: end,
            });
        }
        Ok(ty)
    }

    /// Resolve a type from a user-facing spelling
    ///
    /// Accepts Java keywords (`int`, `long`, ...), field descriptors, and
    /// dotted or slashed class names.
    pub fn from_name(name: &str) -> Result<Self, DescriptorError> {
        let ty = match name {
            "" => return Err(DescriptorError::Empty),
            "void" => JvmType::Void,
            "boolean" => JvmType::Boolean,
            "char" => JvmType::Char,
            "byte" => JvmType::Byte,
            "short" => JvmType::Short,
            "int" => JvmType::Int,
            "float" => JvmType::Float,
            "long" => JvmType::Long,
            "double" => JvmType::Double,
            _ => {
                if let Some(element) = name.strip_suffix("[]") {
                    return Ok(JvmType::Array(Box::new(Self::from_name(element)?)));
                }
                if let Ok(ty) = Self::from_descriptor(name) {
                    return Ok(ty);
                }
                if name.chars().all(|c| c.is_alphanumeric() || "._/$".contains(c)) {
                    JvmType::object(name)
                } else {
                    return Err(DescriptorError::Invalid {
                        descriptor: name.to_string(),
                        position: 0,
                    });
                }
            }
        };
        Ok(ty)
    }

    /// Field descriptor
    pub fn descriptor(&self) -> String {
        match self {
            JvmType::Void => "V".to_string(),
            JvmType::Boolean => "Z".to_string(),
            JvmType::Char => "C".to_string(),
            JvmType::Byte => "B".to_string(),
            JvmType::Short => "S".to_string(),
            JvmType::Int => "I".to_string(),
            JvmType::Float => "F".to_string(),
            JvmType::Long => "J".to_string(),
            JvmType::Double => "D".to_string(),
            JvmType::Array(element) => format!("[{}", element.descriptor()),
            JvmType::Object(name) => format!("L{};", name),
        }
    }

    /// Internal name as used by type operands (`NEW`, invoke owners)
    ///
    /// Arrays use their descriptor, primitives their descriptor letter.
    pub fn internal_name(&self) -> String {
        match self {
            JvmType::Object(name) => name.clone(),
            other => other.descriptor(),
        }
    }

    /// Dotted class name (`java.lang.String`) or the Java keyword
    pub fn class_name(&self) -> String {
        match self {
            JvmType::Object(name) => name.replace('/', "."),
            JvmType::Array(element) => format!("{}[]", element.class_name()),
            other => other.to_string(),
        }
    }

    /// Number of local-variable slots and operand-stack words the value takes
    pub fn size(&self) -> u16 {
        match self {
            JvmType::Void => 0,
            JvmType::Long | JvmType::Double => 2,
            _ => 1,
        }
    }

    /// Check if the type takes two slots
    pub fn is_wide(&self) -> bool {
        self.size() == 2
    }

    /// Check if the type is a primitive (void excluded)
    pub fn is_primitive(&self) -> bool {
        !matches!(self, JvmType::Void | JvmType::Array(_) | JvmType::Object(_))
    }

    /// Check if the type is an array or class reference
    pub fn is_reference(&self) -> bool {
        matches!(self, JvmType::Array(_) | JvmType::Object(_))
    }

    /// Check if values of this type live on the stack as a 32-bit int
    pub fn is_int_like(&self) -> bool {
        matches!(
            self,
            JvmType::Boolean | JvmType::Char | JvmType::Byte | JvmType::Short | JvmType::Int
        )
    }
}

impl fmt::Display for JvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JvmType::Void => write!(f, "void"),
            JvmType::Boolean => write!(f, "boolean"),
            JvmType::Char => write!(f, "char"),
            JvmType::Byte => write!(f, "byte"),
            JvmType::Short => write!(f, "short"),
            JvmType::Int => write!(f, "int"),
            JvmType::Float => write!(f, "float"),
            JvmType::Long => write!(f, "long"),
            JvmType::Double => write!(f, "double"),
            JvmType::Array(_) | JvmType::Object(_) => write!(f, "{}", self.class_name()),
        }
    }
}

/// A parsed method descriptor: `(IJ)Ljava/lang/String;`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types in declaration order
    pub params: Vec<JvmType>,
    /// Return type
    pub ret: JvmType,
}

impl MethodDescriptor {
    /// Parse a method descriptor
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        if descriptor.is_empty() {
            return Err(DescriptorError::Empty);
        }
        if !descriptor.starts_with('(') {
            return Err(DescriptorError::NotAMethod {
                descriptor: descriptor.to_string(),
            });
        }
        let bytes = descriptor.as_bytes();
        let mut pos = 1;
        let mut params = Vec::new();
        loop {
            match bytes.get(pos) {
                Some(b')') => {
                    pos += 1;
                    break;
                }
                Some(b'V') => {
                    return Err(DescriptorError::VoidParameter {
                        descriptor: descriptor.to_string(),
                    })
                }
                Some(_) => {
                    let (param, next) = parse_field(descriptor, pos)?;
                    params.push(param);
                    pos = next;
                }
                None => {
                    return Err(DescriptorError::NotAMethod {
                        descriptor: descriptor.to_string(),
                    })
                }
            }
        }
        let ret = match &descriptor[pos..] {
            "V" => JvmType::Void,
            "" => {
                return Err(DescriptorError::NotAMethod {
                    descriptor: descriptor.to_string(),
                })
            }
            _ => {
                let (ret, end) = parse_field(descriptor, pos)?;
                if end != descriptor.len() {
                    return Err(DescriptorError::Invalid {
                        descriptor: descriptor.to_string(),
                        position: end,
                    });
                }
                ret
            }
        };
        Ok(Self { params, ret })
    }

    /// Build a descriptor from parameter and return types
    pub fn new(params: Vec<JvmType>, ret: JvmType) -> Self {
        Self { params, ret }
    }

    /// Total slots taken by the parameters (receiver excluded)
    pub fn params_size(&self) -> u16 {
        self.params.iter().map(JvmType::size).sum()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for param in &self.params {
            write!(f, "{}", param.descriptor())?;
        }
        write!(f, "){}", self.ret.descriptor())
    }
}

/// Parameter types of a method descriptor
pub fn argument_types(descriptor: &str) -> Result<Vec<JvmType>, DescriptorError> {
    Ok(MethodDescriptor::parse(descriptor)?.params)
}

/// Return type of a method descriptor
pub fn return_type(descriptor: &str) -> Result<JvmType, DescriptorError> {
    Ok(MethodDescriptor::parse(descriptor)?.ret)
}

/// Parse one field type starting at `pos`, returning it and the next offset
fn parse_field(descriptor: &str, pos: usize) -> Result<(JvmType, usize), DescriptorError> {
    let bytes = descriptor.as_bytes();
    let invalid = |position| DescriptorError::Invalid {
        descriptor: descriptor.to_string(),
        position,
    };
    let ty = match bytes.get(pos).ok_or_else(|| invalid(pos))? {
        b'Z' => JvmType::Boolean,
        b'C' => JvmType::Char,
        b'B' => JvmType::Byte,
        b'S' => JvmType::Short,
        b'I' => JvmType::Int,
        b'F' => JvmType::Float,
        b'J' => JvmType::Long,
        b'D' => JvmType::Double,
        b'[' => {
            let (element, next) = parse_field(descriptor, pos + 1)?;
            return Ok((JvmType::Array(Box::new(element)), next));
        }
        b'L' => {
            let rest = &descriptor[pos + 1..];
            let end = rest
                .find(';')
                .ok_or_else(|| DescriptorError::UnterminatedClassName {
                    descriptor: descriptor.to_string(),
                })?;
            if end == 0 {
                return Err(invalid(pos + 1));
            }
            return Ok((JvmType::Object(rest[..end].to_string()), pos + end + 2));
        }
        _ => return Err(invalid(pos)),
    };
    Ok((ty, pos + 1))
}
