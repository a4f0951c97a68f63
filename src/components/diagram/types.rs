//! Data model for the diagram: nodes, edges, and connection handles.

use std::fmt;
use std::str::FromStr;

/// A point in diagram (world) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// The closed set of cloud resource categories a node can represent.
///
/// Purely cosmetic: a resource type selects the node's icon, display name and
/// fallback badge. It carries no semantics about which nodes may connect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceType {
	Ec2,
	Vpc,
	S3,
	Rds,
	Lambda,
	Ecs,
	Iam,
	CloudWatch,
	Sns,
	Sqs,
	ApiGateway,
	DynamoDb,
	Elb,
	Route53,
	CloudFront,
	Ebs,
	Alb,
	Nlb,
	ElastiCache,
	Subnet,
	SecurityGroup,
}

impl ResourceType {
	/// Stable wire tag identifying the resource category ("aws-ec2", ...).
	pub fn tag(self) -> &'static str {
		match self {
			Self::Ec2 => "aws-ec2",
			Self::Vpc => "aws-vpc",
			Self::S3 => "aws-s3",
			Self::Rds => "aws-rds",
			Self::Lambda => "aws-lambda",
			Self::Ecs => "aws-ecs",
			Self::Iam => "aws-iam",
			Self::CloudWatch => "aws-cloudwatch",
			Self::Sns => "aws-sns",
			Self::Sqs => "aws-sqs",
			Self::ApiGateway => "aws-api-gateway",
			Self::DynamoDb => "aws-dynamodb",
			Self::Elb => "aws-elb",
			Self::Route53 => "aws-route53",
			Self::CloudFront => "aws-cloudfront",
			Self::Ebs => "aws-ebs",
			Self::Alb => "aws-alb",
			Self::Nlb => "aws-nlb",
			Self::ElastiCache => "aws-elasticache",
			Self::Subnet => "aws-subnet",
			Self::SecurityGroup => "aws-security-group",
		}
	}

	/// Human-readable name of the resource category.
	pub fn display_name(self) -> &'static str {
		match self {
			Self::Ec2 => "EC2",
			Self::Vpc => "VPC",
			Self::S3 => "S3",
			Self::Rds => "RDS",
			Self::Lambda => "Lambda",
			Self::Ecs => "ECS",
			Self::Iam => "IAM",
			Self::CloudWatch => "CloudWatch",
			Self::Sns => "SNS",
			Self::Sqs => "SQS",
			Self::ApiGateway => "API Gateway",
			Self::DynamoDb => "DynamoDB",
			Self::Elb => "ELB",
			Self::Route53 => "Route 53",
			Self::CloudFront => "CloudFront",
			Self::Ebs => "EBS",
			Self::Alb => "ALB",
			Self::Nlb => "NLB",
			Self::ElastiCache => "ElastiCache",
			Self::Subnet => "Subnet",
			Self::SecurityGroup => "Security Group",
		}
	}

	/// Short text drawn in place of the icon while the image is loading.
	pub fn badge(self) -> &'static str {
		match self {
			Self::ApiGateway => "APIGW",
			Self::CloudWatch => "CW",
			Self::DynamoDb => "DDB",
			Self::Route53 => "R53",
			Self::CloudFront => "CF",
			Self::ElastiCache => "CACHE",
			Self::Lambda => "FN",
			Self::Subnet => "NET",
			Self::SecurityGroup => "SG",
			other => other.display_name(),
		}
	}

	/// Default icon asset URL for this resource type.
	pub fn icon_path(self) -> String {
		format!("assets/icons/{}.svg", self.tag())
	}

	/// Resolve a wire tag back to its resource type.
	pub fn from_tag(tag: &str) -> Option<Self> {
		const ALL: [ResourceType; 21] = [
			ResourceType::Ec2,
			ResourceType::Vpc,
			ResourceType::S3,
			ResourceType::Rds,
			ResourceType::Lambda,
			ResourceType::Ecs,
			ResourceType::Iam,
			ResourceType::CloudWatch,
			ResourceType::Sns,
			ResourceType::Sqs,
			ResourceType::ApiGateway,
			ResourceType::DynamoDb,
			ResourceType::Elb,
			ResourceType::Route53,
			ResourceType::CloudFront,
			ResourceType::Ebs,
			ResourceType::Alb,
			ResourceType::Nlb,
			ResourceType::ElastiCache,
			ResourceType::Subnet,
			ResourceType::SecurityGroup,
		];
		ALL.into_iter().find(|r| r.tag() == tag)
	}
}

/// Per-node payload: one generic record over the resource tag instead of a
/// struct per resource category.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeData {
	pub label: String,
	pub resource_type: ResourceType,
	/// Opaque image URL, supplied at node construction.
	pub icon: String,
}

impl NodeData {
	/// Payload with the resource type's default icon.
	pub fn new(label: impl Into<String>, resource_type: ResourceType) -> Self {
		Self {
			label: label.into(),
			resource_type,
			icon: resource_type.icon_path(),
		}
	}
}

/// A draggable, labeled box on the diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowNode {
	pub id: String,
	pub data: NodeData,
	pub position: Position,
	pub selected: bool,
}

impl FlowNode {
	pub fn new(id: impl Into<String>, data: NodeData, position: Position) -> Self {
		Self {
			id: id.into(),
			data,
			position,
			selected: false,
		}
	}
}

/// Side of a node a handle is anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleSide {
	Top,
	Bottom,
	Left,
	Right,
}

impl HandleSide {
	pub const ALL: [HandleSide; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Top => "top",
			Self::Bottom => "bottom",
			Self::Left => "left",
			Self::Right => "right",
		}
	}
}

/// Whether a handle originates connections or receives them.
///
/// Every side carries both: a visible source handle and an invisible target
/// handle sharing the same anchor, so any side can play either role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
	Source,
	Target,
}

impl HandleKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Source => "source",
			Self::Target => "target",
		}
	}
}

/// A named attachment point on a node, e.g. "right-source" or "left-target".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandleId {
	pub side: HandleSide,
	pub kind: HandleKind,
}

impl HandleId {
	pub fn source(side: HandleSide) -> Self {
		Self {
			side,
			kind: HandleKind::Source,
		}
	}

	pub fn target(side: HandleSide) -> Self {
		Self {
			side,
			kind: HandleKind::Target,
		}
	}
}

impl fmt::Display for HandleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.side.as_str(), self.kind.as_str())
	}
}

impl FromStr for HandleId {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (side, kind) = s.split_once('-').ok_or(())?;
		let side = match side {
			"top" => HandleSide::Top,
			"bottom" => HandleSide::Bottom,
			"left" => HandleSide::Left,
			"right" => HandleSide::Right,
			_ => return Err(()),
		};
		let kind = match kind {
			"source" => HandleKind::Source,
			"target" => HandleKind::Target,
			_ => return Err(()),
		};
		Ok(Self { side, kind })
	}
}

/// A directed visual connection between two node handles.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub source_handle: HandleId,
	pub target_handle: HandleId,
	pub animated: bool,
	pub selected: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn handle_ids_round_trip_wire_format() {
		for side in HandleSide::ALL {
			for kind in [HandleKind::Source, HandleKind::Target] {
				let id = HandleId { side, kind };
				let parsed: HandleId = id.to_string().parse().unwrap();
				assert_eq!(parsed, id);
			}
		}
		assert_eq!(
			"right-source".parse::<HandleId>().unwrap(),
			HandleId::source(HandleSide::Right)
		);
		assert!("middle-source".parse::<HandleId>().is_err());
		assert!("top".parse::<HandleId>().is_err());
	}

	#[test]
	fn resource_tags_resolve_both_ways() {
		assert_eq!(ResourceType::from_tag("aws-ec2"), Some(ResourceType::Ec2));
		assert_eq!(
			ResourceType::from_tag("aws-api-gateway"),
			Some(ResourceType::ApiGateway)
		);
		assert_eq!(ResourceType::from_tag("aws-fargate"), None);
		assert_eq!(ResourceType::SecurityGroup.tag(), "aws-security-group");
	}

	#[test]
	fn node_data_defaults_icon_from_resource_type() {
		let data = NodeData::new("EC2 server", ResourceType::Ec2);
		assert_eq!(data.icon, "assets/icons/aws-ec2.svg");

		// Changing only the label leaves the icon untouched.
		let mut renamed = data.clone();
		renamed.label = "web server".into();
		assert_eq!(renamed.icon, data.icon);
	}
}
